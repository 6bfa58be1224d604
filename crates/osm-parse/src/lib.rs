//! `osm-parse` — streaming OSM XML ingestion.
//!
//! A single pass over a memory-mapped planet extract produces an
//! [`ElementStore`]: tagged nodes, ways, optionally relations, and a
//! coordinate cache covering *every* node seen in the file.  The store is
//! frozen after parsing; all downstream crates borrow from it.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                 |
//! |-------------|----------------------------------------------------------|
//! | [`scanner`] | Byte-level XML scan, attribute extraction, entity decode |
//! | [`store`]   | `Node`/`Way`/`Relation`, `ElementStore`, `ParseReport`   |
//! | [`error`]   | `ParseError`, `ParseResult<T>`                           |
//!
//! # Leniency
//!
//! The scanner is deliberately forgiving: malformed elements are skipped
//! with a report counter bump (and a single `log::warn!` per file), a
//! truncated file yields the data parsed so far, and unknown elements and
//! attributes are ignored.  Only I/O failures are errors.

pub mod error;
pub mod scanner;
pub mod store;


use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Instant;

use memmap2::Mmap;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{ParseError, ParseResult};
pub use store::{Bounds, CoordCache, ElementStore, Member, MemberKind, Node, ParseReport, Relation, Way};

/// Parse an OSM XML file, skipping relations.
///
/// Every `<node>` feeds the coordinate cache; only tagged nodes land in the
/// returned node list.
///
/// # Errors
///
/// [`ParseError::FileNotFound`] if `path` does not exist, [`ParseError::Io`]
/// for any other I/O failure.  Malformed content is not an error; inspect
/// [`ParseReport::malformed_skipped`].
pub fn parse(path: impl AsRef<Path>) -> ParseResult<ElementStore> {
    parse_inner(path.as_ref(), false)
}

/// Parse an OSM XML file, materialising relations as well.
///
/// # Errors
///
/// Same contract as [`parse`].
pub fn parse_with_relations(path: impl AsRef<Path>) -> ParseResult<ElementStore> {
    parse_inner(path.as_ref(), true)
}

/// Parse an in-memory buffer.  Useful for tests and for callers that manage
/// their own I/O.
pub fn parse_bytes(buf: &[u8], keep_relations: bool) -> ElementStore {
    let started = Instant::now();
    let mut builder = store::StoreBuilder::new(keep_relations);
    scanner::scan(buf, &mut builder);
    builder.finish(buf.len() as u64, started.elapsed())
}

fn parse_inner(path: &Path, keep_relations: bool) -> ParseResult<ElementStore> {
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ParseError::FileNotFound(path.to_path_buf()),
        _ => ParseError::Io(e),
    })?;
    let len = file.metadata()?.len();

    // Zero-length files cannot be mapped on every platform; they also have
    // nothing to scan.
    if len == 0 {
        return Ok(parse_bytes(&[], keep_relations));
    }

    // Map when possible, fall back to a buffered read (e.g. pipes, or
    // filesystems without mmap support).
    match unsafe { Mmap::map(&file) } {
        Ok(map) => {
            let store = parse_bytes(&map, keep_relations);
            log::debug!(
                "parsed {} ({} bytes) in {:?}",
                path.display(),
                store.report.bytes_scanned,
                store.report.elapsed
            );
            Ok(store)
        }
        Err(e) => {
            log::debug!("mmap failed for {} ({e}); falling back to read", path.display());
            let buf = std::fs::read(path)?;
            Ok(parse_bytes(&buf, keep_relations))
        }
    }
}
