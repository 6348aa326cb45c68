use chrono::Utc;
use clap::Args;
use punch_core::card::{FlexMessage, synthesize};
use punch_core::punch::CardDefaults;
use punch_core::record::Record;

use crate::util::{exit_error, json_object_arg};

/// Render the card for a saved backend result without calling anything.
#[derive(Args)]
pub struct CardArgs {
    /// Backend result JSON file (use '-' for stdin)
    #[arg(long)]
    pub result_file: String,
    /// Original clock request body as a JSON object
    #[arg(long)]
    pub request: Option<String>,
    /// Default entry-point id (falls back to LIFF_ID)
    #[arg(long)]
    pub liff_id: Option<String>,
    /// Default location name (falls back to LOCATION_NAME)
    #[arg(long)]
    pub location_name: Option<String>,
}

pub fn render(args: &CardArgs, request: &Record, result: &Record) -> FlexMessage {
    let env = CardDefaults::from_env();
    let defaults = CardDefaults {
        liff_id: args.liff_id.clone().or(env.liff_id),
        location_name: args.location_name.clone().or(env.location_name),
    };
    synthesize(request, result, &defaults, Utc::now())
}

pub fn run(args: CardArgs) -> i32 {
    let request = json_object_arg(args.request.as_deref(), None, "--request");
    let result = json_object_arg(None, Some(&args.result_file), "--result-file");
    let card = render(&args, &request, &result);
    match serde_json::to_string_pretty(&card) {
        Ok(out) => {
            println!("{out}");
            0
        }
        Err(e) => exit_error(&format!("Failed to render card: {e}"), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flag_defaults_reach_the_card() {
        let args = CardArgs {
            result_file: "-".to_string(),
            request: None,
            liff_id: Some("cli-liff".to_string()),
            location_name: Some("倉庫".to_string()),
        };
        let result = json!({"ok": true, "tsIso": "2024-01-15T06:30:00Z"})
            .as_object()
            .cloned()
            .unwrap();
        let card = serde_json::to_value(render(&args, &Record::new(), &result)).unwrap();
        assert_eq!(card["altText"], "上班打卡 14:30");
        assert_eq!(
            card["contents"]["footer"]["contents"][2]["action"]["uri"],
            "https://liff.line.me/cli-liff?liff.state=schedule"
        );
        assert_eq!(card["contents"]["body"]["contents"][4]["contents"][1]["text"], "倉庫");
    }
}
