//! Terminal rendering of a settled search.

use std::fmt::Write as _;

use medmap_core::FacilitySource;
use medmap_locator::list::{ListContent, ListItem, RETRY_LABEL};
use medmap_locator::{FacilityLocator, FacilityMarker, ReferencePoint, SearchOutcome, Viewport};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Report<'a> {
    reference: Option<&'a ReferencePoint>,
    source: Option<FacilitySource>,
    summary: Option<&'a str>,
    list: &'a ListContent,
    markers: &'a [FacilityMarker],
    viewport: Viewport,
}

pub(crate) fn print_report(
    locator: &FacilityLocator,
    outcome: &SearchOutcome,
    json: bool,
) -> anyhow::Result<()> {
    if json {
        let source = match outcome {
            SearchOutcome::Found { source, .. } => Some(*source),
            SearchOutcome::NoResults | SearchOutcome::Failed { .. } => None,
        };
        let report = Report {
            reference: locator.state().reference(),
            source,
            summary: locator.list().summary(),
            list: locator.list().content(),
            markers: locator.map().markers(),
            viewport: locator.map().viewport(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!(
            "{}",
            render_text(locator.list().summary(), locator.list().content())
        );
    }
    Ok(())
}

pub(crate) fn render_text(summary: Option<&str>, content: &ListContent) -> String {
    let mut out = String::new();
    match content {
        ListContent::Items { items } => {
            if let Some(summary) = summary {
                let _ = writeln!(out, "{summary}\n");
            }
            for item in items {
                write_item(&mut out, item);
            }
        }
        ListContent::SearchFailed { .. } => {
            if let Some((heading, body)) = content.placeholder() {
                let _ = writeln!(out, "{heading}\n{body}\n[{RETRY_LABEL}]");
            }
        }
        ListContent::Loading | ListContent::NoFacilities | ListContent::NoDefaultFacilities => {
            if let Some((heading, body)) = content.placeholder() {
                if !heading.is_empty() {
                    let _ = writeln!(out, "{heading}");
                }
                let _ = writeln!(out, "{body}");
            }
        }
    }
    out
}

fn write_item(out: &mut String, item: &ListItem) {
    let _ = writeln!(
        out,
        "{:>2}. {} ({})",
        item.display_index, item.name, item.category_label
    );
    let _ = writeln!(out, "    {}", item.address);
    match &item.hours {
        Some(hours) => {
            let _ = writeln!(out, "    {} | {hours}", item.distance);
        }
        None => {
            let _ = writeln!(out, "    {}", item.distance);
        }
    }
    let _ = writeln!(out, "    Directions: {}", item.directions_url);
    if let Some(call) = &item.call_url {
        let _ = writeln!(out, "    Call: {call}");
    }
    out.push('\n');
}
