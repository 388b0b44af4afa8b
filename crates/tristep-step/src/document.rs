//! Exchange-file assembly: header, data section, footer.

use std::fmt::Write;

use crate::builder::BuiltGraph;
use crate::error::StepError;
use crate::options::StepOptions;
use crate::writer::{format_string, write_data_section};
use crate::ExportStats;

/// `FILE_DESCRIPTION` implementation level.
const IMPLEMENTATION_LEVEL: &str = "2;1";

/// A generated STEP file, not yet written anywhere.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedFile {
    /// File name, `model.step` unless configured otherwise.
    pub name: String,
    /// Complete ISO 10303-21 text.
    pub content: String,
    /// Counts gathered while building the file.
    pub stats: ExportStats,
}

impl ExportedFile {
    /// Counts gathered while building the file.
    pub fn stats(&self) -> ExportStats {
        self.stats
    }
}

/// Assemble the full exchange file for a built graph.
pub fn assemble(built: &BuiltGraph, options: &StepOptions) -> Result<ExportedFile, StepError> {
    let mut out = String::with_capacity(128 + built.graph.len() * 48);
    out.push_str("ISO-10303-21;\n");
    write_header(options, &mut out)?;
    out.push('\n');
    out.push_str("DATA;\n");
    write_data_section(&built.graph, &mut out)?;
    out.push_str("ENDSEC;\n");
    out.push_str("END-ISO-10303-21;\n");
    Ok(ExportedFile {
        name: options.file_name.clone(),
        content: out,
        stats: built.stats,
    })
}

fn write_header(options: &StepOptions, out: &mut String) -> Result<(), StepError> {
    let timestamp = match &options.timestamp {
        Some(ts) => ts.clone(),
        None => chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S").to_string(),
    };
    out.push_str("HEADER;\n");
    writeln!(
        out,
        "FILE_DESCRIPTION(({}),{});",
        format_string(&options.description),
        format_string(IMPLEMENTATION_LEVEL)
    )?;
    writeln!(
        out,
        "FILE_NAME({},{},({}),({}),{},{},{});",
        format_string(&options.file_name),
        format_string(&timestamp),
        format_string(&options.author),
        format_string(&options.organization),
        format_string(&options.preprocessor),
        format_string(&options.originating_system),
        format_string(&options.authorization)
    )?;
    writeln!(out, "FILE_SCHEMA(('{}'));", options.schema.file_schema())?;
    out.push_str("ENDSEC;\n");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GraphBuilder;
    use crate::options::Schema;

    fn fixed_options() -> StepOptions {
        StepOptions {
            timestamp: Some("2024-01-01T00:00:00".into()),
            ..StepOptions::default()
        }
    }

    #[test]
    fn test_envelope() {
        let options = fixed_options();
        let built = GraphBuilder::new().finish(&options);
        let file = assemble(&built, &options).unwrap();
        assert_eq!(file.name, "model.step");

        let lines: Vec<&str> = file.content.lines().collect();
        assert_eq!(lines[0], "ISO-10303-21;");
        assert_eq!(lines[1], "HEADER;");
        assert!(lines[2].starts_with("FILE_DESCRIPTION(('tristep export'),'2;1');"));
        assert!(lines[3].starts_with("FILE_NAME('model.step','2024-01-01T00:00:00',('tristep'),(''),"));
        assert_eq!(lines[4], "FILE_SCHEMA(('CONFIG_CONTROL_DESIGN'));");
        assert_eq!(lines[5], "ENDSEC;");
        assert_eq!(lines[6], "");
        assert_eq!(lines[7], "DATA;");
        assert!(lines[8].starts_with("#1 = "));
        assert_eq!(lines[lines.len() - 2], "ENDSEC;");
        assert_eq!(lines[lines.len() - 1], "END-ISO-10303-21;");
        assert!(file.content.ends_with('\n'));
    }

    #[test]
    fn test_header_escapes_metadata() {
        let options = StepOptions {
            author: "O'Brien".into(),
            ..fixed_options()
        };
        let built = GraphBuilder::new().finish(&options);
        let file = assemble(&built, &options).unwrap();
        assert!(file.content.contains("('O''Brien')"));
    }

    #[test]
    fn test_ap214_schema() {
        let options = StepOptions {
            schema: Schema::AutomotiveDesign,
            ..fixed_options()
        };
        let built = GraphBuilder::new().finish(&options);
        let file = assemble(&built, &options).unwrap();
        assert!(file
            .content
            .contains("FILE_SCHEMA(('AUTOMOTIVE_DESIGN { 1 0 10303 214 1 1 1 1 }'));"));
        assert!(file.content.contains("'automotive_design',2000,"));
    }

    #[test]
    fn test_generated_timestamp_shape() {
        let options = StepOptions::default();
        let built = GraphBuilder::new().finish(&options);
        let file = assemble(&built, &options).unwrap();
        let line = file.content.lines().nth(3).unwrap();
        let ts = line.split(',').nth(1).unwrap().trim_matches('\'');
        assert!(chrono::NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S").is_ok());
    }
}
