// HTML extraction for the reference index and entry pages
// Pure functions over page text so tests need no network

#[cfg(test)]
mod tests;

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::reference::{ApiEntry, ApiReference, ApiSection};
use crate::{ApidexError, Result};

pub const SIGNATURE_FALLBACK: &str = "Class definition not found.";
pub const EXAMPLE_FALLBACK: &str = "Example code not found.";

fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| ApidexError::Scrape(format!("Failed to parse selector {}: {:?}", css, e)))
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn resolve_link(base_url: &Url, href: &str) -> String {
    base_url
        .join(href)
        .map(|url| url.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Extract the section/subsection tree from the reference index sidebar.
///
/// Sections are `li.toctree-l1` items, subsections the nested
/// `li.toctree-l2` items; both keep document order. Relative links are
/// resolved against `base_url`.
#[inline]
pub fn parse_reference_index(html: &str, base_url: &Url) -> Result<ApiReference> {
    let document = Html::parse_document(html);
    let section_selector = parse_selector("li.toctree-l1")?;
    let subsection_selector = parse_selector("li.toctree-l2")?;
    let link_selector = parse_selector("a.reference.internal")?;

    let mut reference = ApiReference::default();

    for item in document.select(&section_selector) {
        // The section's own anchor comes before any nested subsection anchors
        let Some(section_link) = item.select(&link_selector).next() else {
            continue;
        };
        let section_name = element_text(section_link);
        if section_name.is_empty() {
            continue;
        }

        let mut section = ApiSection {
            link: section_link
                .value()
                .attr("href")
                .map(|href| resolve_link(base_url, href))
                .unwrap_or_default(),
            subsections: Default::default(),
        };

        for sub_item in item.select(&subsection_selector) {
            let Some(sub_link) = sub_item.select(&link_selector).next() else {
                continue;
            };
            let sub_name = element_text(sub_link);
            if sub_name.is_empty() {
                continue;
            }

            section.subsections.insert(
                sub_name,
                ApiEntry {
                    link: sub_link
                        .value()
                        .attr("href")
                        .map(|href| resolve_link(base_url, href))
                        .unwrap_or_default(),
                    class_signature: String::new(),
                    example_code: String::new(),
                },
            );
        }

        reference.sections.insert(section_name, section);
    }

    if reference.sections.is_empty() {
        return Err(ApidexError::Scrape(
            "Could not find the reference sidebar; check the page structure".to_string(),
        ));
    }

    Ok(reference)
}

/// Class signature from an entry page, formatted as
/// `class {prename}{name}({params})`. Pages without a signature block yield
/// a fixed fallback string rather than an error.
#[inline]
pub fn extract_class_signature(html: &str) -> String {
    let document = Html::parse_document(html);
    let Ok(signature_selector) = Selector::parse("dt.sig.sig-object.py") else {
        return SIGNATURE_FALLBACK.to_string();
    };
    let Some(signature) = document.select(&signature_selector).next() else {
        return SIGNATURE_FALLBACK.to_string();
    };

    let name = Selector::parse("span.sig-name")
        .ok()
        .and_then(|sel| signature.select(&sel).next())
        .map(element_text)
        .unwrap_or_default();

    let prename = Selector::parse("span.sig-prename")
        .ok()
        .and_then(|sel| signature.select(&sel).next())
        .map(element_text)
        .unwrap_or_default();

    let params = Selector::parse("em.sig-param")
        .map(|sel| {
            signature
                .select(&sel)
                .map(|param| element_text(param).replace('\n', ""))
                .collect::<Vec<String>>()
        })
        .unwrap_or_default();

    format!("class {}{}({})", prename, name, params.join(", "))
}

/// Example snippet from the doctest block, with interpreter prompts
/// stripped. Pages without an example yield a fixed fallback string.
#[inline]
pub fn extract_example_code(html: &str) -> String {
    let document = Html::parse_document(html);
    let Ok(example_selector) = Selector::parse("div.doctest pre") else {
        return EXAMPLE_FALLBACK.to_string();
    };
    let Some(example) = document.select(&example_selector).next() else {
        return EXAMPLE_FALLBACK.to_string();
    };

    let code = example.text().collect::<String>();
    let cleaned: Vec<&str> = code
        .lines()
        .map(|line| {
            line.strip_prefix(">>> ")
                .or_else(|| line.strip_prefix("... "))
                .unwrap_or(line)
        })
        .collect();

    cleaned.join("\n").trim().to_string()
}
