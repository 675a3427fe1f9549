//! Splitting a rendered HTML page into sections.

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::Section;

/// A heading-delimited region of the page body, collected during the
/// event walk. Raw byte offsets into the source are kept so the section's
/// HTML fragment can be sliced out verbatim.
struct Block {
    level: u8,
    anchor: Option<String>,
    title: String,
    titles: Vec<String>,
    text: String,
    html_start: usize,
    html_end: usize,
}

/// Split a rendered HTML fragment into an ordered sequence of [`Section`]s.
///
/// The body is partitioned at heading elements (`h1`–`h6`, all levels
/// treated uniformly): each heading opens a region running until the next
/// heading or end of input. The result is:
///
/// - A page-level section, always first, with an empty anchor. It owns the
///   text preceding the first heading and the text of headings that carry
///   no `id` attribute. When the page *opens* with a heading, that heading
///   is the page title: its body text is owned by the page-level section
///   so whole-page queries match it.
/// - One anchored section per heading with an `id` attribute, in document
///   order, carrying its breadcrumb of ancestor heading titles.
///
/// The input is treated as potentially malformed; parsing stops at the
/// first unrecoverable parser error and whatever was collected so far is
/// returned.
#[must_use]
pub fn split_page(html: &str) -> Vec<Section> {
    let mut reader = Reader::from_str(html);
    let config = reader.config_mut();
    config.trim_text(false);
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    let mut preamble_text = String::new();
    let mut blocks: Vec<Block> = Vec::new();
    let mut first_block_start: Option<usize> = None;

    // Previously seen headings at shallower levels, for breadcrumbs
    let mut heading_stack: Vec<(u8, String)> = Vec::new();
    // Set while between a heading's start and end tags
    let mut in_heading = false;
    // Set while inside an element whose text is never indexable
    let mut skip_tag: Option<Vec<u8>> = None;

    loop {
        let pos = position(&reader, html);
        match reader.read_event() {
            // Tolerate malformed tails: keep what was parsed so far
            Err(_) | Ok(Event::Eof) => break,
            Ok(Event::Start(e) | Event::Empty(e)) => {
                if skip_tag.is_some() {
                    continue;
                }
                let name = e.local_name().as_ref().to_ascii_lowercase();
                if let Some(level) = heading_level(&name) {
                    if in_heading {
                        // Malformed nesting: close the pending heading first
                        complete_heading(&mut blocks, &mut heading_stack);
                    }
                    if let Some(open) = blocks.last_mut() {
                        open.html_end = pos;
                    }
                    if first_block_start.is_none() {
                        first_block_start = Some(pos);
                    }
                    blocks.push(Block {
                        level,
                        anchor: id_attr(&e),
                        title: String::new(),
                        titles: Vec::new(),
                        text: String::new(),
                        html_start: pos,
                        html_end: html.len(),
                    });
                    in_heading = true;
                } else if name == b"script" || name == b"style" {
                    skip_tag = Some(name);
                }
            }
            Ok(Event::End(e)) => {
                let name = e.local_name().as_ref().to_ascii_lowercase();
                if skip_tag.as_deref() == Some(name.as_slice()) {
                    skip_tag = None;
                } else if in_heading && heading_level(&name).is_some() {
                    complete_heading(&mut blocks, &mut heading_stack);
                    in_heading = false;
                }
            }
            Ok(Event::Text(e)) => {
                if skip_tag.is_none()
                    && let Ok(text) = reader.decoder().decode(&e)
                {
                    push_text(
                        &text,
                        in_heading,
                        &mut blocks,
                        &mut preamble_text,
                    );
                }
            }
            Ok(Event::GeneralRef(e)) => {
                if skip_tag.is_none()
                    && let Ok(entity) = reader.decoder().decode(&e)
                {
                    let text = decode_entity(&entity);
                    push_text(&text, in_heading, &mut blocks, &mut preamble_text);
                }
            }
            Ok(Event::CData(e)) => {
                if skip_tag.is_none() {
                    let text = String::from_utf8_lossy(&e).into_owned();
                    push_text(&text, in_heading, &mut blocks, &mut preamble_text);
                }
            }
            Ok(
                Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_),
            ) => {}
        }
    }

    if in_heading {
        // Input ended inside a heading element
        complete_heading(&mut blocks, &mut heading_stack);
    }

    assemble(html, &preamble_text, first_block_start, blocks)
}

/// Build the final section list from the collected blocks.
fn assemble(
    html: &str,
    preamble_text: &str,
    first_block_start: Option<usize>,
    blocks: Vec<Block>,
) -> Vec<Section> {
    let preamble_html = first_block_start.map_or(html, |i| &html[..i]);
    let preamble = normalize_ws(preamble_text);

    // A page that opens with a heading treats it as the page title: its
    // body belongs to the page-level section for whole-page matching.
    let page_owns_first = preamble.is_empty() && !blocks.is_empty();

    let mut page_text = Vec::new();
    if !preamble.is_empty() {
        page_text.push(preamble);
    }

    let mut page_title = None;
    if page_owns_first {
        let first = &blocks[0];
        page_title = Some(first.title.clone());
        let body = normalize_ws(&first.text);
        if !body.is_empty() {
            page_text.push(body);
        }
    }

    // Headings without an id produce no anchored section, but their text
    // still counts toward whole-page matching
    for (i, block) in blocks.iter().enumerate() {
        if block.anchor.is_none() && !(i == 0 && page_owns_first) {
            let text = normalize_ws(&format!("{} {}", block.title, block.text));
            if !text.is_empty() {
                page_text.push(text);
            }
        }
    }

    let page_html = if preamble_html.trim().is_empty() {
        if page_owns_first {
            html[blocks[0].html_start..blocks[0].html_end].to_owned()
        } else {
            String::new()
        }
    } else {
        preamble_html.to_owned()
    };

    let mut sections = vec![Section {
        anchor: String::new(),
        titles: Vec::new(),
        title: page_title,
        text: page_text.join(" "),
        html: page_html,
        is_page: true,
    }];

    for (i, block) in blocks.into_iter().enumerate() {
        let Some(anchor) = block.anchor else { continue };
        let text = if i == 0 && page_owns_first {
            // Body owned by the page-level section; the anchored entry
            // stays addressable through its title
            String::new()
        } else {
            normalize_ws(&block.text)
        };
        sections.push(Section {
            anchor,
            titles: block.titles,
            title: Some(block.title),
            text,
            html: html[block.html_start..block.html_end].to_owned(),
            is_page: false,
        });
    }

    sections
}

/// Finalize the most recent block's heading: normalize the title and
/// resolve its breadcrumb from previously seen shallower headings.
fn complete_heading(blocks: &mut [Block], stack: &mut Vec<(u8, String)>) {
    let Some(block) = blocks.last_mut() else {
        return;
    };
    block.title = normalize_ws(&block.title);
    while stack.last().is_some_and(|(level, _)| *level >= block.level) {
        stack.pop();
    }
    block.titles = stack.iter().map(|(_, title)| title.clone()).collect();
    stack.push((block.level, block.title.clone()));
}

/// Route character data to the heading title, the open block's body, or
/// the preamble.
fn push_text(text: &str, in_heading: bool, blocks: &mut [Block], preamble: &mut String) {
    let target = match blocks.last_mut() {
        Some(block) if in_heading => &mut block.title,
        Some(block) => &mut block.text,
        None => preamble,
    };
    target.push_str(text);
}

/// Heading level for `h1`–`h6` tag names (lowercase input).
fn heading_level(name: &[u8]) -> Option<u8> {
    match name {
        [b'h', digit @ b'1'..=b'6'] => Some(digit - b'0'),
        _ => None,
    }
}

/// Extract a non-empty `id` attribute from a start tag.
fn id_attr(e: &BytesStart<'_>) -> Option<String> {
    for attr in e.attributes().with_checks(false).flatten() {
        if attr.key.local_name().as_ref() == b"id" {
            return attr
                .unescape_value()
                .ok()
                .map(|value| value.into_owned())
                .filter(|value| !value.is_empty());
        }
    }
    None
}

/// Decode a general entity reference name (without `&` and `;`).
///
/// Unknown named entities decode to nothing rather than leaking markup
/// into indexed text.
fn decode_entity(name: &str) -> String {
    match name {
        "amp" => "&".to_owned(),
        "lt" => "<".to_owned(),
        "gt" => ">".to_owned(),
        "quot" => "\"".to_owned(),
        "apos" => "'".to_owned(),
        "nbsp" => "\u{a0}".to_owned(),
        _ => name
            .strip_prefix('#')
            .and_then(|num| {
                if let Some(hex) = num.strip_prefix(['x', 'X']) {
                    u32::from_str_radix(hex, 16).ok()
                } else {
                    num.parse().ok()
                }
            })
            .and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_default(),
    }
}

/// Collapse all whitespace runs to single spaces and trim the ends.
fn normalize_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Current byte offset into the source, clamped to its length.
fn position(reader: &Reader<&[u8]>, html: &str) -> usize {
    usize::try_from(reader.buffer_position())
        .unwrap_or(usize::MAX)
        .min(html.len())
}
