//! Assembles the blocks of one record and enforces block multiplicity.

use std::collections::BTreeMap;
use std::io::BufRead;
use std::marker::PhantomData;

use log::{debug, trace};

use flatseq_core::{codes, Dialect, Diagnostics, Origin, Result};
use flatseq_record::{Record, RecordBuilder, UnknownBlock};

use crate::block::{Block, BlockReader, BlockRule, Fragment, LineKind, Occurrence};
use crate::config::ReaderConfig;
use crate::cursor::{Line, LineCursor};

/// The line layout of one dialect: how lines are classified, how they are
/// grouped into blocks, and which reader decodes each block.
pub trait BlockSyntax {
    const DIALECT: Dialect;

    fn classify(text: &str) -> LineKind;

    /// Tag of the block family a line tag belongs to.
    fn family(tag: &str) -> &str {
        tag
    }

    /// Collect the block opened by `first`, consuming its continuation lines.
    fn collect<R: BufRead>(cursor: &mut LineCursor<R>, first: Line, tag: &str) -> Result<Block>;

    /// Known blocks in canonical order.
    fn rules() -> &'static [BlockRule];

    fn reader(tag: &str) -> Option<&'static dyn BlockReader>;

    /// Tag that opens a record.
    fn record_start() -> &'static str;

    /// Spacer blocks carry no data and are skipped.
    fn is_spacer(_tag: &str) -> bool {
        false
    }

    fn is_sequence(tag: &str) -> bool;

    fn is_features(tag: &str) -> bool;

    fn rule(tag: &str) -> Option<&'static BlockRule> {
        Self::rules().iter().find(|r| r.tag == tag)
    }
}

/// Reads one record at a time from a [`LineCursor`].
#[derive(Debug, Clone, Copy)]
pub struct RecordAssembler<S> {
    config: ReaderConfig,
    syntax: PhantomData<S>,
}

struct RecordState {
    builder: RecordBuilder,
    diagnostics: Diagnostics,
    occurrences: BTreeMap<&'static str, Vec<Origin>>,
    highest_rank: Option<(u8, &'static str)>,
    first_line: u32,
    last_line: u32,
    blocks: usize,
}

impl<S: BlockSyntax> RecordAssembler<S> {
    pub fn new(config: ReaderConfig) -> Self {
        Self {
            config,
            syntax: PhantomData,
        }
    }

    fn starts_record(tag: &str) -> bool {
        S::rule(S::family(tag)).is_some()
    }

    /// Skip to the next record and read it. `Ok(None)` at end of input.
    pub fn next_record<R: BufRead>(
        &self,
        cursor: &mut LineCursor<R>,
    ) -> Result<Option<(Record, Diagnostics)>> {
        let first = loop {
            let Some(line) = cursor.next_line()? else {
                return Ok(None);
            };
            match S::classify(&line.text) {
                LineKind::Tagged(tag) if Self::starts_record(&tag) => break line,
                LineKind::Blank => {}
                _ => debug!("skipping line {} outside any record", line.number),
            }
        };

        let mut state = RecordState {
            builder: RecordBuilder::new(S::DIALECT),
            diagnostics: Diagnostics::new(),
            occurrences: BTreeMap::new(),
            highest_rank: None,
            first_line: first.number,
            last_line: first.number,
            blocks: 0,
        };
        cursor.push_back(first)?;

        let mut terminated = false;
        while let Some(line) = cursor.next_line()? {
            match S::classify(&line.text) {
                LineKind::Terminator => {
                    state.last_line = line.number;
                    terminated = true;
                    break;
                }
                LineKind::Blank => {}
                LineKind::Untagged => {
                    state.last_line = line.number;
                    state.diagnostics.warning(
                        codes::STRAY_LINE,
                        Origin::line(line.number),
                        "Line outside any block ignored",
                    );
                }
                LineKind::Tagged(tag) => {
                    if state.blocks > 0 && S::family(&tag) == S::record_start() {
                        cursor.push_back(line)?;
                        break;
                    }
                    let block = S::collect(cursor, line, &tag)?;
                    state.last_line = block.origin.last_line;
                    self.accept(&mut state, block);
                }
            }
        }

        let record_origin = Origin::new(state.first_line, state.last_line);
        if !terminated {
            state.diagnostics.error(
                codes::MISSING_TERMINATOR,
                record_origin,
                "Record is not terminated by '//'",
            );
        }
        Self::check_multiplicity(&mut state, record_origin);

        state.builder.set_origin(record_origin);
        let record = state.builder.build();
        debug!(
            "assembled {} record {} ({}) with {} diagnostics",
            S::DIALECT,
            record.primary_accession().unwrap_or("-"),
            record_origin,
            state.diagnostics.len()
        );
        Ok(Some((record, state.diagnostics)))
    }

    fn accept(&self, state: &mut RecordState, block: Block) {
        trace!("{} block {} at {}", S::DIALECT, block.tag, block.origin);
        if S::is_spacer(&block.tag) {
            return;
        }
        state.blocks += 1;

        let Some(rule) = S::rule(&block.tag) else {
            debug!("keeping unknown {} block {}", S::DIALECT, block.tag);
            state.diagnostics.info(
                codes::UNKNOWN_LINE_TYPE,
                block.origin,
                format!("Unknown line type '{}' kept verbatim", block.tag),
            );
            state.builder.add_unknown(UnknownBlock {
                tag: block.tag,
                lines: block.lines.into_iter().map(|l| l.raw).collect(),
                origin: block.origin,
            });
            return;
        };

        state.occurrences.entry(rule.tag).or_default().push(block.origin);
        match state.highest_rank {
            Some((rank, after)) if rule.rank < rank => {
                state.diagnostics.info(
                    codes::BLOCK_OUT_OF_ORDER,
                    block.origin,
                    format!("Block {} should appear before block {}", rule.tag, after),
                );
            }
            _ => state.highest_rank = Some((rule.rank, rule.tag)),
        }

        if (!self.config.read_sequence && S::is_sequence(rule.tag))
            || (!self.config.read_features && S::is_features(rule.tag))
        {
            trace!("skipping decode of {} block", rule.tag);
            return;
        }

        let Some(reader) = S::reader(rule.tag) else {
            return;
        };
        if let Some(fragment) = reader.read(&block, &mut state.diagnostics) {
            if !place(&mut state.builder, fragment) {
                debug!("ignoring repeated {} block at {}", rule.tag, block.origin);
            }
        }
    }

    fn check_multiplicity(state: &mut RecordState, record_origin: Origin) {
        for rule in S::rules() {
            let seen = state.occurrences.get(rule.tag).map_or(&[][..], Vec::as_slice);
            let origin = Origin::covering(seen.iter().copied()).unwrap_or(record_origin);
            match rule.occurrence {
                Occurrence::ExactlyOnce if seen.len() != 1 => state.diagnostics.error(
                    codes::BLOCK_EXACTLY_ONCE,
                    origin,
                    format!("Block {} must occur exactly once", rule.tag),
                ),
                Occurrence::AtMostOnce if seen.len() > 1 => state.diagnostics.error(
                    codes::BLOCK_AT_MOST_ONCE,
                    origin,
                    format!("Block {} must not occur more than once", rule.tag),
                ),
                _ => {}
            }
        }
    }
}

/// Put a decoded fragment into the record. Returns `false` when a
/// single-valued block was already present.
fn place(builder: &mut RecordBuilder, fragment: Fragment) -> bool {
    match fragment {
        Fragment::Identification(v) => builder.set_identification(v),
        Fragment::Accessions(v) => builder.set_accessions(v),
        Fragment::Version(v) => builder.set_version(v),
        Fragment::ProjectLinks(v) => builder.set_project_links(v),
        Fragment::Dates(v) => builder.set_dates(v),
        Fragment::Description(v) => builder.set_description(v),
        Fragment::Keywords(v) => builder.set_keywords(v),
        Fragment::Organism(v) => builder.set_organism(v),
        Fragment::Comment(v) => builder.set_comment(v),
        Fragment::Contig(v) => builder.set_contig(v),
        Fragment::Sequence(v) => builder.set_sequence(v),
        Fragment::Reference(v) => {
            builder.add_reference(v);
            true
        }
        Fragment::CrossReferences(v) => {
            builder.add_cross_references(v);
            true
        }
        Fragment::Features(v) => {
            builder.add_features(v);
            true
        }
    }
}
