use serde_json::Value;

use super::{plain, waterfall_results};

/// Print just the headline numbers, one per line.
///
/// Waterfall output prints fund proceeds per scenario (share-class proceeds
/// when no funds were given); other commands print their key field.
pub fn print_minimal(value: &Value) {
    if let Some(results) = waterfall_results(value) {
        for scenario in results {
            let id = plain(&scenario["scenarioId"], "");
            let funds = scenario["fundProceeds"].as_array().filter(|f| !f.is_empty());
            match funds {
                Some(funds) => {
                    for fund in funds {
                        println!(
                            "{}\t{}\t{}",
                            id,
                            plain(&fund["fundName"], ""),
                            plain(&fund["proceeds"], "")
                        );
                    }
                }
                None => {
                    for row in scenario["shareClassProceeds"].as_array().into_iter().flatten() {
                        println!(
                            "{}\t{}\t{}",
                            id,
                            plain(&row["shareClassName"], ""),
                            plain(&row["proceeds"], "")
                        );
                    }
                }
            }
        }
        return;
    }

    match value.get("result") {
        // Generated scenarios: one exit value per line
        Some(Value::Array(arr)) => {
            for item in arr {
                println!("{}", plain(item.get("exitValue").unwrap_or(item), "null"));
            }
        }
        Some(Value::Object(map)) => {
            if let Some(valid) = map.get("valid") {
                println!("{}", plain(valid, "null"));
            } else if let Some((key, val)) = map.iter().next() {
                println!("{}: {}", key, plain(val, "null"));
            }
        }
        _ => println!("{}", plain(value, "null")),
    }
}
