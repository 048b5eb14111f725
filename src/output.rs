use std::io::{self, Write};

use serde::Serialize;

use crate::reference::Sample;

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Text,
    Json,
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_sample(sample: &Sample) -> io::Result<()> {
        Self::print_json(sample)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

pub struct TextOutput;

impl TextOutput {
    pub fn print_sample(sample: &Sample) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(render_sample(sample).as_bytes())
    }
}

pub fn render_sample(sample: &Sample) -> String {
    let mut out = String::new();
    out.push_str(&format!("name: {}\n", sample.name));
    if let Some(tax_id) = sample.tax_id {
        out.push_str(&format!("taxon: {tax_id}\n"));
    }
    if let Some(organism) = &sample.organism {
        out.push_str(&format!("organism: {organism}\n"));
    }
    if sample.attributes.is_empty() {
        return out;
    }
    out.push_str("attributes:\n");
    for attribute in &sample.attributes {
        out.push_str(&format!("  {}", attribute.tag()));
        if let Some(value) = attribute.value() {
            out.push_str(&format!(" = {value}"));
        }
        if let Some(units) = attribute.units() {
            out.push_str(&format!(" {units}"));
        }
        out.push('\n');
    }
    out
}
