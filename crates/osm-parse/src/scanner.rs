//! Byte-level OSM XML scan.
//!
//! # Why not an XML library
//!
//! OSM extracts use a tiny, rigid element vocabulary (`node`, `way`,
//! `relation`, `tag`, `nd`, `member`, `bounds`) and throughput is the whole
//! game: a planet extract is hundreds of megabytes of markup of which only
//! the attribute values matter.  The scanner walks raw bytes, recognises the
//! opening tokens directly, and extracts attributes with bounded sub-scans
//! between quote characters.  No DOM, no allocation per element beyond the
//! owned strings the store keeps.
//!
//! # Recovery
//!
//! The scanner never fails.  A child element whose parent closer is missing
//! ends the parent at the next element opener; an element with a missing or
//! unparseable required attribute is skipped; both bump the report's
//! malformed counter.  Scanning always resumes at the next `<`.

use osm_core::{GeoPoint, NodeId, RelationId, TagMap, WayId};

use crate::store::{Bounds, Member, MemberKind, StoreBuilder};

/// Scan `buf` start to end, feeding every recognised element into `builder`.
pub(crate) fn scan(buf: &[u8], builder: &mut StoreBuilder) {
    let mut pos = 0;
    while let Some(lt) = find_byte(buf, pos, b'<') {
        let start = lt + 1;
        let rest = &buf[start.min(buf.len())..];
        pos = if rest.starts_with(b"node") && at_boundary(buf, start + 4) {
            scan_node(buf, start + 4, builder)
        } else if rest.starts_with(b"way") && at_boundary(buf, start + 3) {
            scan_way(buf, start + 3, builder)
        } else if rest.starts_with(b"relation") && at_boundary(buf, start + 8) {
            scan_relation(buf, start + 8, builder)
        } else if rest.starts_with(b"bounds") && at_boundary(buf, start + 6) {
            scan_bounds(buf, start + 6, builder)
        } else {
            // `<osm>`, `<?xml?>`, comments, closers, unknown elements.
            skip_markup(buf, start)
        };
    }
}

// ── Element scans ─────────────────────────────────────────────────────────────

fn scan_node(buf: &[u8], pos: usize, builder: &mut StoreBuilder) -> usize {
    let Some((gt, self_closing)) = find_tag_end(buf, pos) else {
        builder.note_malformed("unterminated <node>");
        return buf.len();
    };
    let attrs = &buf[pos..gt];

    let id = attr(attrs, b"id").and_then(parse_i64);
    let lat = attr(attrs, b"lat").and_then(parse_f64);
    let lon = attr(attrs, b"lon").and_then(parse_f64);
    let (Some(id), Some(lat), Some(lon)) = (id, lat, lon) else {
        builder.note_malformed("node missing id/lat/lon");
        return gt + 1;
    };
    let point = GeoPoint::new(lat, lon);

    if self_closing {
        builder.add_node(NodeId(id), point, TagMap::new());
        return gt + 1;
    }

    let mut tags = TagMap::new();
    let mut pos = gt + 1;
    loop {
        let Some(lt) = find_byte(buf, pos, b'<') else {
            // Truncated file: keep the partial element.
            builder.add_node(NodeId(id), point, tags);
            return buf.len();
        };
        let start = lt + 1;
        let rest = &buf[start.min(buf.len())..];
        if rest.starts_with(b"/node") {
            builder.add_node(NodeId(id), point, tags);
            return skip_markup(buf, start);
        } else if rest.starts_with(b"tag") && at_boundary(buf, start + 3) {
            pos = scan_tag(buf, start + 3, &mut tags, builder);
        } else if opens_element(buf, start) {
            // Closer never arrived; finish here and resynchronise.
            builder.note_malformed("unclosed <node>");
            builder.add_node(NodeId(id), point, tags);
            return lt;
        } else {
            pos = skip_markup(buf, start);
        }
    }
}

fn scan_way(buf: &[u8], pos: usize, builder: &mut StoreBuilder) -> usize {
    let Some((gt, self_closing)) = find_tag_end(buf, pos) else {
        builder.note_malformed("unterminated <way>");
        return buf.len();
    };
    let attrs = &buf[pos..gt];

    let Some(id) = attr(attrs, b"id").and_then(parse_i64) else {
        builder.note_malformed("way missing id");
        return gt + 1;
    };

    if self_closing {
        builder.add_way(WayId(id), Vec::new(), TagMap::new());
        return gt + 1;
    }

    let mut refs: Vec<NodeId> = Vec::new();
    let mut tags = TagMap::new();
    let mut pos = gt + 1;
    loop {
        let Some(lt) = find_byte(buf, pos, b'<') else {
            builder.add_way(WayId(id), refs, tags);
            return buf.len();
        };
        let start = lt + 1;
        let rest = &buf[start.min(buf.len())..];
        if rest.starts_with(b"/way") {
            builder.add_way(WayId(id), refs, tags);
            return skip_markup(buf, start);
        } else if rest.starts_with(b"nd") && at_boundary(buf, start + 2) {
            pos = scan_nd(buf, start + 2, &mut refs, builder);
        } else if rest.starts_with(b"tag") && at_boundary(buf, start + 3) {
            pos = scan_tag(buf, start + 3, &mut tags, builder);
        } else if opens_element(buf, start) {
            builder.note_malformed("unclosed <way>");
            builder.add_way(WayId(id), refs, tags);
            return lt;
        } else {
            pos = skip_markup(buf, start);
        }
    }
}

fn scan_relation(buf: &[u8], pos: usize, builder: &mut StoreBuilder) -> usize {
    let Some((gt, self_closing)) = find_tag_end(buf, pos) else {
        builder.note_malformed("unterminated <relation>");
        return buf.len();
    };
    let attrs = &buf[pos..gt];

    let Some(id) = attr(attrs, b"id").and_then(parse_i64) else {
        builder.note_malformed("relation missing id");
        return gt + 1;
    };

    if self_closing {
        builder.add_relation(RelationId(id), Vec::new(), TagMap::new());
        return gt + 1;
    }

    let mut members: Vec<Member> = Vec::new();
    let mut tags = TagMap::new();
    let mut pos = gt + 1;
    loop {
        let Some(lt) = find_byte(buf, pos, b'<') else {
            builder.add_relation(RelationId(id), members, tags);
            return buf.len();
        };
        let start = lt + 1;
        let rest = &buf[start.min(buf.len())..];
        if rest.starts_with(b"/relation") {
            builder.add_relation(RelationId(id), members, tags);
            return skip_markup(buf, start);
        } else if rest.starts_with(b"member") && at_boundary(buf, start + 6) {
            pos = scan_member(buf, start + 6, &mut members, builder);
        } else if rest.starts_with(b"tag") && at_boundary(buf, start + 3) {
            pos = scan_tag(buf, start + 3, &mut tags, builder);
        } else if opens_element(buf, start) {
            builder.note_malformed("unclosed <relation>");
            builder.add_relation(RelationId(id), members, tags);
            return lt;
        } else {
            pos = skip_markup(buf, start);
        }
    }
}

fn scan_bounds(buf: &[u8], pos: usize, builder: &mut StoreBuilder) -> usize {
    let Some((gt, _)) = find_tag_end(buf, pos) else {
        builder.note_malformed("unterminated <bounds>");
        return buf.len();
    };
    let attrs = &buf[pos..gt];

    let min_lat = attr(attrs, b"minlat").and_then(parse_f64);
    let min_lon = attr(attrs, b"minlon").and_then(parse_f64);
    let max_lat = attr(attrs, b"maxlat").and_then(parse_f64);
    let max_lon = attr(attrs, b"maxlon").and_then(parse_f64);
    match (min_lat, min_lon, max_lat, max_lon) {
        (Some(min_lat), Some(min_lon), Some(max_lat), Some(max_lon)) => {
            builder.set_bounds(Bounds { min_lat, min_lon, max_lat, max_lon });
        }
        _ => builder.note_malformed("bounds missing extents"),
    }
    gt + 1
}

// ── Child scans ───────────────────────────────────────────────────────────────

fn scan_tag(buf: &[u8], pos: usize, tags: &mut TagMap, builder: &mut StoreBuilder) -> usize {
    let Some((gt, _)) = find_tag_end(buf, pos) else {
        builder.note_malformed("unterminated <tag>");
        return buf.len();
    };
    let attrs = &buf[pos..gt];
    match attr(attrs, b"k") {
        Some(k) => {
            // Missing value degrades to an empty string; a keyless tag is junk.
            let v = attr(attrs, b"v").unwrap_or(b"");
            tags.insert(&decode_text(k), &decode_text(v));
        }
        None => builder.note_malformed("tag missing k"),
    }
    gt + 1
}

fn scan_nd(buf: &[u8], pos: usize, refs: &mut Vec<NodeId>, builder: &mut StoreBuilder) -> usize {
    let Some((gt, _)) = find_tag_end(buf, pos) else {
        builder.note_malformed("unterminated <nd>");
        return buf.len();
    };
    match attr(&buf[pos..gt], b"ref").and_then(parse_i64) {
        Some(id) => refs.push(NodeId(id)),
        None => builder.note_malformed("nd missing ref"),
    }
    gt + 1
}

fn scan_member(
    buf: &[u8],
    pos: usize,
    members: &mut Vec<Member>,
    builder: &mut StoreBuilder,
) -> usize {
    let Some((gt, _)) = find_tag_end(buf, pos) else {
        builder.note_malformed("unterminated <member>");
        return buf.len();
    };
    let attrs = &buf[pos..gt];

    let kind = match attr(attrs, b"type") {
        Some(t) if t == b"node" => Some(MemberKind::Node),
        Some(t) if t == b"way" => Some(MemberKind::Way),
        Some(t) if t == b"relation" => Some(MemberKind::Relation),
        _ => None,
    };
    let ref_id = attr(attrs, b"ref").and_then(parse_i64);
    match (kind, ref_id) {
        (Some(kind), Some(ref_id)) => {
            let role = attr(attrs, b"role").map(decode_text).unwrap_or_default();
            members.push(Member { kind, ref_id, role: role.into() });
        }
        _ => builder.note_malformed("member missing type/ref"),
    }
    gt + 1
}

// ── Low-level helpers ─────────────────────────────────────────────────────────

#[inline]
fn find_byte(buf: &[u8], from: usize, byte: u8) -> Option<usize> {
    let from = from.min(buf.len());
    buf[from..].iter().position(|&b| b == byte).map(|i| from + i)
}

/// `true` when position `i` ends an element-name token (whitespace, `/`,
/// `>`, or end of buffer).
#[inline]
fn at_boundary(buf: &[u8], i: usize) -> bool {
    buf.get(i).is_none_or(|b| b.is_ascii_whitespace() || *b == b'/' || *b == b'>')
}

/// `true` when `start` begins one of the three element openers.  Used to
/// resynchronise when a parent closer is missing.
fn opens_element(buf: &[u8], start: usize) -> bool {
    let rest = &buf[start.min(buf.len())..];
    (rest.starts_with(b"node") && at_boundary(buf, start + 4))
        || (rest.starts_with(b"way") && at_boundary(buf, start + 3))
        || (rest.starts_with(b"relation") && at_boundary(buf, start + 8))
}

/// Find the `>` closing the markup that began just before `pos`, respecting
/// quoted attribute values.  Returns the index of `>` and whether the tag is
/// self-closing.
fn find_tag_end(buf: &[u8], mut pos: usize) -> Option<(usize, bool)> {
    let mut quote: Option<u8> = None;
    while pos < buf.len() {
        let b = buf[pos];
        match quote {
            Some(q) => {
                if b == q {
                    quote = None;
                }
            }
            None => match b {
                b'"' | b'\'' => quote = Some(b),
                b'>' => {
                    let self_closing = pos > 0 && buf[pos - 1] == b'/';
                    return Some((pos, self_closing));
                }
                _ => {}
            },
        }
        pos += 1;
    }
    None
}

/// Skip non-element markup starting at `start` (the byte after `<`).
/// Comments are consumed through `-->` so markup inside them is never
/// scanned; for everything else the resume position is `start` itself — the
/// scan loop resynchronises on the next `<`, and raw `<` is illegal inside
/// attribute values, so nothing real can hide before it.
fn skip_markup(buf: &[u8], start: usize) -> usize {
    let rest = &buf[start.min(buf.len())..];
    if rest.starts_with(b"!--") {
        let mut i = start + 3;
        while i + 3 <= buf.len() {
            if &buf[i..i + 3] == b"-->" {
                return i + 3;
            }
            i += 1;
        }
        return buf.len();
    }
    start
}

/// Extract the quoted value of `name` from an attribute region.
///
/// The name must be preceded by whitespace (or start the region) so that
/// `ref` never matches inside `href`.  Single and double quotes are accepted.
fn attr<'a>(attrs: &'a [u8], name: &[u8]) -> Option<&'a [u8]> {
    let mut i = 0;
    while i + name.len() <= attrs.len() {
        if attrs[i..].starts_with(name) && (i == 0 || attrs[i - 1].is_ascii_whitespace()) {
            let mut j = i + name.len();
            while j < attrs.len() && attrs[j].is_ascii_whitespace() {
                j += 1;
            }
            if j < attrs.len() && attrs[j] == b'=' {
                j += 1;
                while j < attrs.len() && attrs[j].is_ascii_whitespace() {
                    j += 1;
                }
                if j < attrs.len() && (attrs[j] == b'"' || attrs[j] == b'\'') {
                    let q = attrs[j];
                    let start = j + 1;
                    if let Some(end) = find_byte(attrs, start, q) {
                        return Some(&attrs[start..end]);
                    }
                }
                return None;
            }
        }
        i += 1;
    }
    None
}

#[inline]
fn parse_i64(v: &[u8]) -> Option<i64> {
    std::str::from_utf8(v).ok()?.trim().parse().ok()
}

#[inline]
fn parse_f64(v: &[u8]) -> Option<f64> {
    let x: f64 = std::str::from_utf8(v).ok()?.trim().parse().ok()?;
    x.is_finite().then_some(x)
}

/// Decode attribute bytes: lossy UTF-8, then XML entity expansion.
fn decode_text(raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw);
    unescape(&text).into_owned()
}

/// Longest entity body we will look at (`&#1114111;` is 8 chars + `#`).
const MAX_ENTITY_LEN: usize = 10;

/// Expand the five named XML entities plus decimal and hex character
/// references.  Anything unrecognised is passed through literally.
pub(crate) fn unescape(raw: &str) -> std::borrow::Cow<'_, str> {
    use std::borrow::Cow;

    if !raw.contains('&') {
        return Cow::Borrowed(raw);
    }

    let mut out = String::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        let rest = &raw[i..];
        if !rest.starts_with('&') {
            let next = rest.find('&').unwrap_or(rest.len());
            out.push_str(&rest[..next]);
            i += next;
            continue;
        }

        // Bounded entity lookahead.
        let semi = rest
            .char_indices()
            .take(MAX_ENTITY_LEN + 2)
            .find(|&(_, c)| c == ';')
            .map(|(j, _)| j);
        let decoded = semi.and_then(|j| {
            let entity = &rest[1..j];
            let c = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => {
                    let code = entity.strip_prefix('#')?;
                    let code = match code.strip_prefix(['x', 'X']) {
                        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                        None => code.parse::<u32>().ok()?,
                    };
                    char::from_u32(code)
                }
            };
            c.map(|c| (c, j))
        });

        match decoded {
            Some((c, j)) => {
                out.push(c);
                i += j + 1;
            }
            None => {
                out.push('&');
                i += 1;
            }
        }
    }
    Cow::Owned(out)
}
