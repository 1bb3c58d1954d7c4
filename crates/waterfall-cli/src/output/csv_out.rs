use serde_json::Value;
use std::io;

use super::{plain, waterfall_results};

type StdoutWriter<'a> = csv::Writer<io::StdoutLock<'a>>;

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    if let Some(results) = waterfall_results(value) {
        write_waterfall_csv(&mut wtr, results);
    } else {
        match value.get("result") {
            Some(Value::Array(arr)) => write_array_csv(&mut wtr, arr),
            Some(Value::Object(result)) => {
                // Two-column CSV: field, value
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in result {
                    let _ = wtr.write_record([key.as_str(), &plain(val, "")]);
                }
            }
            _ => {
                let _ = wtr.write_record([&plain(value, "")]);
            }
        }
    }

    let _ = wtr.flush();
}

/// One row per share class and per fund, for every scenario.
fn write_waterfall_csv(wtr: &mut StdoutWriter<'_>, results: &[Value]) {
    let _ = wtr.write_record([
        "scenario_id",
        "exit_value",
        "entity",
        "id",
        "name",
        "proceeds",
        "proceeds_per_share",
        "percent_of_total",
    ]);

    for scenario in results {
        let scenario_id = plain(&scenario["scenarioId"], "");
        let exit_value = plain(&scenario["exitValue"], "");

        for row in scenario["shareClassProceeds"].as_array().into_iter().flatten() {
            let _ = wtr.write_record([
                scenario_id.as_str(),
                exit_value.as_str(),
                "share_class",
                &plain(&row["shareClassId"], ""),
                &plain(&row["shareClassName"], ""),
                &plain(&row["proceeds"], ""),
                &plain(&row["proceedsPerShare"], ""),
                &plain(&row["percentOfTotal"], ""),
            ]);
        }
        for fund in scenario["fundProceeds"].as_array().into_iter().flatten() {
            let _ = wtr.write_record([
                scenario_id.as_str(),
                exit_value.as_str(),
                "fund",
                &plain(&fund["fundId"], ""),
                &plain(&fund["fundName"], ""),
                &plain(&fund["proceeds"], ""),
                "",
                &plain(&fund["percentOfTotal"], ""),
            ]);
        }
    }
}

fn write_array_csv(wtr: &mut StdoutWriter<'_>, arr: &[Value]) {
    // Extract headers from first object
    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(|v| plain(v, "")).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&plain(item, "")]);
        }
    }
}
