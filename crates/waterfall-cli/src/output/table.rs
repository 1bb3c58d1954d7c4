use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{plain, waterfall_results};

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    if let Some(results) = waterfall_results(value) {
        for scenario in results {
            print_scenario(scenario);
        }
    } else {
        match value.get("result") {
            Some(Value::Array(arr)) => print_array_table(arr),
            Some(result @ Value::Object(_)) => print_flat_object(result),
            _ => print_flat_object(value),
        }
    }

    print_envelope_notes(value);
}

fn print_scenario(scenario: &Value) {
    println!(
        "\nScenario {} (exit value {})",
        plain(&scenario["scenarioId"], "?"),
        plain(&scenario["exitValue"], "?")
    );

    let mut classes = Builder::default();
    classes.push_record(["Share Class", "Treatment", "Proceeds", "Per Share", "% of Total"]);
    if let Some(rows) = scenario["shareClassProceeds"].as_array() {
        for row in rows {
            classes.push_record([
                plain(&row["shareClassName"], ""),
                plain(&row["treatment"], ""),
                plain(&row["proceeds"], ""),
                plain(&row["proceedsPerShare"], "n/a"),
                plain(&row["percentOfTotal"], "n/a"),
            ]);
        }
    }
    println!("{}", Table::from(classes));

    let funds = match scenario["fundProceeds"].as_array() {
        Some(funds) if !funds.is_empty() => funds,
        _ => return,
    };
    let mut builder = Builder::default();
    builder.push_record(["Fund", "Proceeds", "% of Total", "Breakdown"]);
    for fund in funds {
        let breakdown: Vec<String> = fund["shareClassBreakdown"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .map(|b| {
                        format!(
                            "{}: {}",
                            plain(&b["shareClassName"], ""),
                            plain(&b["proceeds"], "")
                        )
                    })
                    .collect()
            })
            .unwrap_or_default();
        builder.push_record([
            plain(&fund["fundName"], ""),
            plain(&fund["proceeds"], ""),
            plain(&fund["percentOfTotal"], "n/a"),
            breakdown.join("; "),
        ]);
    }
    println!("{}", Table::from(builder));
}

fn print_envelope_notes(value: &Value) {
    if let Some(Value::Array(warnings)) = value.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = value.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_flat_object(value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map {
            if key == "warnings" || key == "methodology" {
                continue;
            }
            builder.push_record([key.clone(), plain(val, "null")]);
        }
        println!("{}", Table::from(builder));
    } else {
        println!("{}", value);
    }
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    // Collect all keys from first object for headers
    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(|v| plain(v, "null")).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", plain(item, "null"));
        }
    }
}
