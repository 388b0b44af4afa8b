//! DATA section serialization.
//!
//! Ids are assigned here and nowhere else: one pass over the sealed graph in
//! creation order, entity at position `i` gets `#(i + 1)`. Every line has
//! the form `#id = KEYWORD(field,field,...);`, complex instances
//! `#id = ( RECORD(...) RECORD(...) );`.

use std::fmt::Write;

use crate::entity::{Entity, EntityRef, Field};
use crate::error::StepError;
use crate::graph::SealedGraph;

/// Maps graph positions to `#n` ids for one sealed graph.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'g> {
    graph: &'g SealedGraph,
}

impl<'g> Resolver<'g> {
    /// Resolver for `graph`.
    pub fn new(graph: &'g SealedGraph) -> Self {
        Self { graph }
    }

    /// Id of the entity at `r`. Refs issued by another graph are rejected
    /// even when their position is in range.
    pub fn resolve(&self, r: EntityRef) -> Result<u64, StepError> {
        if self.graph.owns(r) {
            Ok(r.index as u64 + 1)
        } else {
            Err(StepError::UnresolvedReference(r.index))
        }
    }
}

/// Write every entity of `graph` as one line, in id order.
pub fn write_data_section(graph: &SealedGraph, out: &mut String) -> Result<(), StepError> {
    let resolver = Resolver::new(graph);
    for (index, entity) in graph.entities().iter().enumerate() {
        write!(out, "#{} = ", index + 1)?;
        write_entity(entity, &resolver, out)?;
        out.push_str(";\n");
    }
    Ok(())
}

fn write_entity(entity: &Entity, resolver: &Resolver<'_>, out: &mut String) -> Result<(), StepError> {
    match entity.kind.keyword() {
        Some(keyword) => {
            out.push_str(keyword);
            write_args(&entity.fields, resolver, out)
        }
        None => {
            out.push('(');
            for record in &entity.fields {
                out.push(' ');
                write_field(record, resolver, out)?;
            }
            out.push_str(" )");
            Ok(())
        }
    }
}

fn write_args(fields: &[Field], resolver: &Resolver<'_>, out: &mut String) -> Result<(), StepError> {
    out.push('(');
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_field(field, resolver, out)?;
    }
    out.push(')');
    Ok(())
}

fn write_field(field: &Field, resolver: &Resolver<'_>, out: &mut String) -> Result<(), StepError> {
    match field {
        Field::Ref(r) => write!(out, "#{}", resolver.resolve(*r)?)?,
        Field::String(s) => out.push_str(&format_string(s)),
        Field::Real(v) => out.push_str(&format_real(*v)),
        Field::Integer(i) => write!(out, "{i}")?,
        Field::Enum(name) => write!(out, ".{name}.")?,
        Field::Bool(b) => out.push_str(if *b { ".T." } else { ".F." }),
        Field::List(items) => write_args(items, resolver, out)?,
        Field::Derived => out.push('*'),
        Field::Unset => out.push('$'),
        Field::Typed { type_name, args } => {
            out.push_str(type_name);
            write_args(args, resolver, out)?;
        }
    }
    Ok(())
}

/// Render a finite real as a STEP literal.
///
/// Uses the shortest text that reads back to the same `f64`, always with a
/// digit after the decimal point and an upper-case exponent: `1.0`, `-0.5`,
/// `1.0E-7`, `1.5E20`. Negative zero is written as `0.0`.
pub fn format_real(v: f64) -> String {
    let s = format!("{:?}", v + 0.0);
    match s.split_once('e') {
        Some((mantissa, exp)) if mantissa.contains('.') => format!("{mantissa}E{exp}"),
        Some((mantissa, exp)) => format!("{mantissa}.0E{exp}"),
        None => s,
    }
}

/// Render a string as a quoted STEP literal.
///
/// `'` and `\` are doubled. Characters outside printable ASCII use the
/// `\X2\hhhh\X0\` encoding (UTF-16 code units, so astral characters become
/// a surrogate pair).
pub fn format_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    let mut wide: Vec<u16> = Vec::new();
    for c in s.chars() {
        if c == ' ' || c.is_ascii_graphic() {
            flush_wide(&mut wide, &mut out);
            match c {
                '\'' => out.push_str("''"),
                '\\' => out.push_str("\\\\"),
                _ => out.push(c),
            }
        } else {
            let mut buf = [0u16; 2];
            wide.extend_from_slice(c.encode_utf16(&mut buf));
        }
    }
    flush_wide(&mut wide, &mut out);
    out.push('\'');
    out
}

fn flush_wide(wide: &mut Vec<u16>, out: &mut String) {
    if wide.is_empty() {
        return;
    }
    out.push_str("\\X2\\");
    for unit in wide.drain(..) {
        out.push_str(&format!("{unit:04X}"));
    }
    out.push_str("\\X0\\");
}
