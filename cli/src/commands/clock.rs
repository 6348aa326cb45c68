use clap::{Args, ValueEnum};
use serde_json::{Map, Value};

use crate::util::{api_request, json_object_arg};

#[derive(Clone, Copy, ValueEnum)]
pub enum Direction {
    In,
    Out,
}

#[derive(Args)]
pub struct ClockArgs {
    /// Clock in or out
    #[arg(long, value_enum, default_value = "in")]
    pub action: Direction,
    /// Reason shown on the card
    #[arg(long)]
    pub note: Option<String>,
    /// Entry-point id used for the card's deep links
    #[arg(long)]
    pub liff_id: Option<String>,
    /// Extra request fields as a JSON object (userId, idToken, lat, lng, ...)
    #[arg(long, short = 'd')]
    pub data: Option<String>,
    /// Read extra request fields from file (use '-' for stdin)
    #[arg(long, short = 'f', conflicts_with = "data")]
    pub data_file: Option<String>,
}

/// Merge flags over the extra fields; flags win.
pub fn build_body(args: &ClockArgs, mut body: Map<String, Value>) -> Map<String, Value> {
    let action = match args.action {
        Direction::In => "IN",
        Direction::Out => "OUT",
    };
    body.insert("action".to_string(), Value::from(action));
    if let Some(note) = &args.note {
        body.insert("note".to_string(), Value::from(note.as_str()));
    }
    if let Some(liff_id) = &args.liff_id {
        body.insert("liffId".to_string(), Value::from(liff_id.as_str()));
    }
    body
}

pub async fn run(api_url: &str, args: ClockArgs) -> i32 {
    let extra = json_object_arg(args.data.as_deref(), args.data_file.as_deref(), "--data");
    let body = build_body(&args, extra);
    api_request(
        api_url,
        reqwest::Method::POST,
        "/api/clock",
        Some(Value::Object(body)),
    )
    .await
}
