use clap::Args;
use serde_json::json;

use crate::util::api_request;

#[derive(Args)]
pub struct ScheduleArgs {
    /// Employee user id
    #[arg(long)]
    pub user_id: String,
    /// Month to fetch (YYYY-MM)
    #[arg(long)]
    pub month: String,
}

pub async fn run(api_url: &str, args: ScheduleArgs) -> i32 {
    api_request(
        api_url,
        reqwest::Method::POST,
        "/api/schedule",
        Some(json!({"userId": args.user_id, "month": args.month})),
    )
    .await
}
