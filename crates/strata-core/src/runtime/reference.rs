//! Reference exports: a basic value printer and a Rust symbol demangler.
//!
//! These are what the `strata` CLI runs against, and a working example of
//! the export contract for anyone writing a real embedded side.
//!
//! The value printer renders:
//!
//! - records as `{ name = value; ... }`, fields printed through the bridge
//!   (summary mode prints `<type>` followed by `{...}` and does not descend)
//! - `bool` as `true` / `false`, `char` as a quoted character
//! - pointer types (names ending in `*`) in hex
//! - any other scalar as a signed decimal

use rustc_demangle::try_demangle;

use super::{HostServices, InProcessRuntime, Raised};
use crate::marshal::{EmbeddedValue, StreamRef};
use crate::registry::Callback;

/// An `InProcessRuntime` exporting the reference value printer and demangler.
#[must_use]
pub fn reference_runtime() -> InProcessRuntime
{
    InProcessRuntime::new()
        .with_export(Callback::ValuePrint.name(), value_print)
        .with_export(Callback::Demangle.name(), demangle)
}

fn value_print(args: &[EmbeddedValue], host: &mut dyn HostServices) -> Result<EmbeddedValue, Raised>
{
    let [target, stream, type_name, summary] = args else {
        return Err(Raised::new(format!("value print expects 4 arguments, got {}", args.len())));
    };
    let (Some(target), Some(stream), Some(type_name), Some(summary)) =
        (target.as_immediate(), stream.as_stream(), type_name.as_str(), summary.as_bool())
    else {
        return Err(Raised::new("value print: ill-typed arguments"));
    };

    let fields = host.field_names();
    if fields.is_empty() {
        host.write(stream, &format_scalar(type_name, target))?;
    } else if summary {
        host.write(stream, &format!("<{type_name}> {{...}}"))?;
    } else {
        print_record(host, stream, &fields)?;
    }
    Ok(EmbeddedValue::UNIT)
}

fn print_record(host: &mut dyn HostServices, stream: StreamRef, fields: &[String]) -> Result<(), Raised>
{
    host.write(stream, "{ ")?;
    for (index, name) in fields.iter().enumerate() {
        if index > 0 {
            host.write(stream, "; ")?;
        }
        host.write(stream, &format!("{name} = "))?;
        host.print_field(stream, index)?;
    }
    host.write(stream, " }")
}

fn format_scalar(type_name: &str, word: i64) -> String
{
    match type_name {
        "bool" => (word != 0).to_string(),
        "char" => u8::try_from(word)
            .ok()
            .filter(u8::is_ascii_graphic)
            .map_or_else(|| format!("'\\x{word:02x}'"), |byte| format!("'{}'", char::from(byte))),
        name if name.ends_with('*') => format!("0x{word:x}"),
        _ => word.to_string(),
    }
}

fn demangle(args: &[EmbeddedValue], _host: &mut dyn HostServices) -> Result<EmbeddedValue, Raised>
{
    let [mangled] = args else {
        return Err(Raised::new(format!("demangle expects 1 argument, got {}", args.len())));
    };
    let mangled = mangled
        .as_str()
        .ok_or_else(|| Raised::new("demangle: argument is not a string"))?;

    Ok(match try_demangle(mangled) {
        Ok(symbol) => EmbeddedValue::some(EmbeddedValue::Str(format!("{symbol:#}"))),
        Err(_) => EmbeddedValue::none(),
    })
}
