//! `history` subcommand.

use crate::Settings;
use pw_core::HistoryItem;
use pw_store::HistoryStore;
use pw_utils::dates::format_display_datetime;
use pw_utils::format::format_ndvi;

pub fn run_history(settings: &Settings, json: bool) -> anyhow::Result<()> {
    let history = HistoryStore::open(settings.open_store()?);
    let items = history.items();
    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }
    if items.is_empty() {
        println!("No analysis history. Results appear here once you run `analyze`.");
        return Ok(());
    }
    for item in &items {
        println!("{}", history_line(item));
    }
    Ok(())
}

fn history_line(item: &HistoryItem) -> String {
    format!(
        "{}  {:<16} {:<26} NDVI {:>7}",
        format_display_datetime(&item.date),
        item.location,
        item.status.label(),
        format_ndvi(item.ndvi_difference)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pw_core::ChangeStatus;

    #[test]
    fn test_history_line() {
        let item = HistoryItem {
            id: "1".to_string(),
            date: Utc.with_ymd_and_hms(2024, 3, 9, 16, 5, 0).unwrap(),
            location: "Land Area 2".to_string(),
            ndvi_difference: -0.25,
            image_url: String::new(),
            status: ChangeStatus::PossibleIllegal,
        };
        let line = history_line(&item);
        assert!(line.starts_with("Mar 9, 2024, 04:05 PM  Land Area 2"));
        assert!(line.contains("Possible Illegal Activity"));
        assert!(line.ends_with("NDVI  -0.250"));
    }
}
