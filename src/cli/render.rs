//! `render` and `attrs` commands.

use anyhow::Result;
use std::io::{self, Write};

use super::args::RequestArgs;
use crate::seo::{Engine, Request};
use crate::seo::context::QueryState;

/// Print the head block, or nothing for a closed render gate.
pub fn render_head(
    engine: &Engine,
    args: &RequestArgs,
    status: u16,
    title: Option<&str>,
    separator: Option<&str>,
) -> Result<()> {
    let mut request = Request {
        status,
        document_title: title.map(str::to_string),
        title_separator: separator.map(str::to_string),
        ..args.to_request()
    };
    let state = route_or_not_found(engine, &mut request);

    match engine.render(&request, &state) {
        Some(head) => write_stdout(&head),
        None => {
            crate::log!("render"; "no output for {} (status {})", request.uri, request.status);
            Ok(())
        }
    }
}

/// Print the `<html>` attribute string.
pub fn render_attrs(engine: &Engine, args: &RequestArgs, existing: &str) -> Result<()> {
    let mut request = args.to_request();
    let state = route_or_not_found(engine, &mut request);
    write_stdout(&format!("{}\n", engine.html_attributes(&request, &state, existing)))
}

/// Query state for the request; unknown paths are served as 404.
fn route_or_not_found(engine: &Engine, request: &mut Request) -> QueryState {
    engine.route(request).unwrap_or_else(|| {
        crate::debug!("route"; "{} matched nothing", request.uri);
        request.status = 404;
        QueryState::default()
    })
}

fn write_stdout(text: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
