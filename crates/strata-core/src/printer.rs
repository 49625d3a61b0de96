//! # Recursive Value Printer
//!
//! Depth-bounded rendering of debuggee values through the embedded runtime.
//!
//! Each value goes through the same steps:
//!
//! ```text
//! Init -> Resolving -> Encoding -> Invoking -> Done
//!             |            \
//!             |             `-> Truncated   (depth bound reached)
//!             `-> Done, no output           (callback not exported)
//! ```
//!
//! During `Invoking` the embedded printer may call back into the bridge
//! through [`HostServices::print_field`]. That starts a fresh request for the
//! field with `depth + 1`, so the printer and its host-services frame are
//! mutually recursive and the depth always travels as an explicit value.
//!
//! ## Failure handling
//!
//! Every value renders into its own buffer. The buffer is appended to the
//! parent's output only if the embedded call returned normally, so a value
//! whose printer raised leaves no partial text behind while its siblings and
//! parent still render. Contract violations are different: they abort the
//! whole top-level print.

use std::fmt;

use tracing::{trace, warn};

use crate::config::Settings;
use crate::error::{BridgeError, BridgeResult};
use crate::marshal::{self, StreamRef};
use crate::registry::Callback;
use crate::runtime::{BridgeContext, EmbeddedRuntime, HostServices, Raised};
use crate::types::{PrintOptions, TypedValueRef};

/// Text written in place of a value nested deeper than the max depth.
pub const TRUNCATION_MARKER: &str = "...";

/// How a single value's print ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintOutcome
{
    /// The embedded printer ran to completion; its output was written.
    Rendered,
    /// The depth bound was reached; the truncation marker was written.
    Truncated,
    /// No value printer is exported; nothing was written.
    Unsupported,
    /// The embedded printer raised; nothing was written.
    Suppressed,
}

/// One value to print, at a given depth.
#[derive(Debug, Clone, Copy)]
pub struct PrintRequest<'v>
{
    pub value: TypedValueRef<'v>,
    pub stream: StreamRef,
    pub depth: u32,
}

impl<'v> PrintRequest<'v>
{
    /// Request for a value printed directly by the host.
    pub fn top_level(value: TypedValueRef<'v>) -> Self
    {
        Self {
            value,
            stream: StreamRef::from_raw(0),
            depth: 0,
        }
    }

    /// Request for field `index` of this request's value, one level deeper.
    pub fn nested(&self, index: usize) -> Option<Self>
    {
        let depth = self.depth.saturating_add(1);
        self.value.field(index).map(|value| Self {
            value,
            stream: StreamRef::from_raw(depth),
            depth,
        })
    }
}

/// Print `value` into `out`.
///
/// `options.max_depth` overrides the configured max depth for this call
/// (including every nested field); otherwise the configured value is read now.
///
/// ## Errors
///
/// - `OutOfBounds`: the top-level value's bytes don't cover its type
/// - `ContractViolation`: the embedded printer returned something other than unit
/// - `Output`: `out` refused the text
pub fn print(
    runtime: &dyn EmbeddedRuntime,
    context: &BridgeContext,
    value: TypedValueRef<'_>,
    options: PrintOptions,
    out: &mut dyn fmt::Write,
) -> BridgeResult<PrintOutcome>
{
    let printer = ValuePrinter {
        runtime,
        context,
        summary_only: options.summary_only,
        max_depth: options.max_depth.unwrap_or_else(|| context.settings().max_depth()),
    };

    let mut rendered = String::new();
    let outcome = printer.render(&PrintRequest::top_level(value), &mut rendered)?;
    out.write_str(&rendered)?;
    Ok(outcome)
}

/// Options and collaborators shared by every value of one top-level print.
struct ValuePrinter<'p>
{
    runtime: &'p dyn EmbeddedRuntime,
    context: &'p BridgeContext,
    summary_only: bool,
    max_depth: u32,
}

impl ValuePrinter<'_>
{
    fn render(&self, request: &PrintRequest<'_>, out: &mut String) -> BridgeResult<PrintOutcome>
    {
        let depth = request.depth;
        let type_name = request.value.ty().name();
        trace!(depth, type_name, "print: resolving");

        let handle = self.context.registry().resolve(Callback::ValuePrint, self.runtime);
        let Some(entry) = handle.entry() else {
            trace!(depth, type_name, "print: no value printer exported");
            return Ok(PrintOutcome::Unsupported);
        };

        if depth >= self.max_depth {
            trace!(depth, max_depth = self.max_depth, "print: truncated");
            out.push_str(TRUNCATION_MARKER);
            return Ok(PrintOutcome::Truncated);
        }

        trace!(depth, type_name, "print: encoding");
        let args = marshal::encode_print_args(&request.value, request.stream, self.summary_only)?;

        trace!(depth, type_name, "print: invoking");
        let mut frame = Frame {
            printer: self,
            request: *request,
            buffer: String::new(),
            aborted: None,
        };
        let result = self.runtime.invoke(entry, &args, &mut frame);

        if let Some(err) = frame.aborted.take() {
            return Err(err);
        }

        match result {
            Ok(returned) => {
                marshal::decode_unit("value print", &returned)?;
                out.push_str(&frame.buffer);
                Ok(PrintOutcome::Rendered)
            }
            Err(raised) => {
                report_suppressed(self.context.settings(), request, &raised);
                Ok(PrintOutcome::Suppressed)
            }
        }
    }
}

fn report_suppressed(settings: &Settings, request: &PrintRequest<'_>, raised: &Raised)
{
    if settings.diagnostics() {
        warn!(
            depth = request.depth,
            type_name = request.value.ty().name(),
            address = %request.value.address(),
            error = %raised,
            "embedded value printer raised; output suppressed"
        );
    } else {
        trace!(depth = request.depth, error = %raised, "print: suppressed");
    }
}

/// Host services handed to the embedded printer while one value is invoking.
struct Frame<'f, 'p, 'v>
{
    printer: &'f ValuePrinter<'p>,
    request: PrintRequest<'v>,
    buffer: String,
    aborted: Option<BridgeError>,
}

impl Frame<'_, '_, '_>
{
    fn check_stream(&self, stream: StreamRef) -> Result<(), Raised>
    {
        if stream == self.request.stream {
            Ok(())
        } else {
            Err(Raised::new(format!(
                "stream {} is not the stream of the value being printed",
                stream.raw()
            )))
        }
    }
}

impl HostServices for Frame<'_, '_, '_>
{
    fn write(&mut self, stream: StreamRef, text: &str) -> Result<(), Raised>
    {
        self.check_stream(stream)?;
        self.buffer.push_str(text);
        Ok(())
    }

    fn print_field(&mut self, stream: StreamRef, index: usize) -> Result<(), Raised>
    {
        self.check_stream(stream)?;
        if let Some(err) = &self.aborted {
            return Err(Raised::new(format!("print aborted: {err}")));
        }
        let child = self.request.nested(index).ok_or_else(|| {
            Raised::new(format!("{} has no field {index}", self.request.value.ty().name()))
        })?;

        match self.printer.render(&child, &mut self.buffer) {
            Ok(_) => Ok(()),
            Err(err) if err.is_contract_violation() => {
                let raised = Raised::new(format!("print aborted: {err}"));
                self.aborted = Some(err);
                Err(raised)
            }
            Err(err) => {
                // A field whose bytes can't be read is one bad value, not a bad print.
                let raised = Raised::new(err.to_string());
                report_suppressed(self.printer.context.settings(), &child, &raised);
                Ok(())
            }
        }
    }

    fn field_names(&self) -> Vec<String>
    {
        self.request.value.ty().fields().iter().map(|field| field.name.clone()).collect()
    }

    fn depth(&self) -> u32
    {
        self.request.depth
    }

    fn max_depth(&self) -> u32
    {
        self.printer.max_depth
    }

    fn search_path(&self) -> Option<String>
    {
        self.printer.context.settings().search_path()
    }
}
