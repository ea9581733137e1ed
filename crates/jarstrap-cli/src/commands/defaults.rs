use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use jarstrap_core::declaration::{DeclName, DeclValue};
use jarstrap_core::defaults::load_defaults;

use crate::output;

#[derive(Serialize)]
struct DefaultEntry {
    name: &'static str,
    value: serde_json::Value,
}

/// Print the declarations currently inside the template's config window.
pub fn run(template: &Path, json: bool) -> Result<()> {
    let values = load_defaults(template)?;

    if json {
        let entries: Vec<DefaultEntry> = values
            .iter()
            .map(|(name, value)| DefaultEntry {
                name: name.as_source().trim_end_matches("[]"),
                value: match value {
                    DeclValue::Text(s) | DeclValue::Raw(s) => serde_json::Value::from(s.as_str()),
                    DeclValue::UInt(n) => serde_json::Value::from(*n),
                },
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    output::print_header(&format!("Defaults in {}", template.display()));
    if values.is_empty() {
        output::print_warning("no recognized declarations in a CONFIG window");
        return Ok(());
    }
    for name in DeclName::ALL {
        match values.get(name) {
            Some(value) => output::print_key_value(name.label(), &value.to_string()),
            None => output::print_key_value(name.label(), "(not declared)"),
        }
    }
    Ok(())
}
