use super::scheme::{Search, SearchScheme};
use super::scoring::ScoringMatrix;
use crate::{BiCursor, FmIndex, IndexStorage, text_with_rank_support::block::Block};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Match,
    Substitute,
    Insert,
    Delete,
}

impl Tag {
    fn is_match_or_insert(self) -> bool {
        matches!(self, Tag::Match | Tag::Insert)
    }
}

// Dense symbol codes start at 1 (0 is the sentinel), so 0 doubles as "no symbol seen yet" without
// needing an Option.
const NO_SYMBOL: u8 = 0;

#[derive(Clone, Copy)]
struct Frame {
    part: usize,
    e: usize,
    query_pos_l: isize,
    query_pos_r: isize,
    left_tag: Tag,
    right_tag: Tag,
    left_last_ref: u8,
    left_last_query: u8,
    right_last_ref: u8,
    right_last_query: u8,
}

fn with_side(mut frame: Frame, right: bool, tag: Tag, last_ref: Option<u8>, last_query: Option<u8>) -> Frame {
    if right {
        frame.right_tag = tag;
        if let Some(r) = last_ref {
            frame.right_last_ref = r;
        }
        if let Some(q) = last_query {
            frame.right_last_query = q;
        }
    } else {
        frame.left_tag = tag;
        if let Some(r) = last_ref {
            frame.left_last_ref = r;
        }
        if let Some(q) = last_query {
            frame.left_last_query = q;
        }
    }
    frame
}

// Every dense symbol the cursor can be extended with, paired with the resulting cursor. Uses the
// single-cursor fast path (direct BWT symbol read) once `count() == 1`, matching the single-cursor
// fast path described for the approximate-search engine.
fn step_candidates<I: IndexStorage, B: Block>(
    cursor: BiCursor<I, B>,
    right: bool,
) -> Vec<(u8, BiCursor<I, B>)> {
    if cursor.count() == 1 {
        let symbol = if right {
            cursor.symbol_right()
        } else {
            cursor.symbol_left()
        };
        let extended = if right {
            cursor.extend_right_dense(symbol)
        } else {
            cursor.extend_left_dense(symbol)
        };
        vec![(symbol, extended)]
    } else {
        let all = if right {
            cursor.extend_right_all()
        } else {
            cursor.extend_left_all()
        };
        all.into_iter()
            .enumerate()
            .map(|(i, c)| ((i + 1) as u8, c))
            .filter(|(_, c)| c.count() > 0)
            .collect()
    }
}

fn recurse_into_edit<I: IndexStorage, B: Block>(
    search: &Search,
    partition: &mut [usize],
    mut next: Frame,
    cursor: BiCursor<I, B>,
    part_id: usize,
    right: bool,
    query: &[u8],
    delegate: &mut dyn FnMut(BiCursor<I, B>, usize) -> bool,
) -> bool {
    if right {
        next.query_pos_r += 1;
    } else {
        next.query_pos_l -= 1;
    }

    let saved = partition[part_id];
    partition[part_id] -= 1;

    let result = if partition[part_id] == 0 {
        let mut advanced = next;
        advanced.part += 1;
        search_next_edit(search, partition, advanced, cursor, query, delegate)
    } else {
        search_next_edit(search, partition, next, cursor, query, delegate)
    };

    partition[part_id] = saved;
    result
}

#[allow(clippy::too_many_arguments)]
fn search_next_edit<I: IndexStorage, B: Block>(
    search: &Search,
    partition: &mut [usize],
    frame: Frame,
    cursor: BiCursor<I, B>,
    query: &[u8],
    delegate: &mut dyn FnMut(BiCursor<I, B>, usize) -> bool,
) -> bool {
    if cursor.count() == 0 {
        return false;
    }

    let num_parts = search.num_parts();

    if frame.part == num_parts {
        let last = num_parts - 1;
        let tags_ok =
            frame.left_tag.is_match_or_insert() && frame.right_tag.is_match_or_insert();
        return if tags_ok && search.l[last] <= frame.e && frame.e <= search.u[last] {
            delegate(cursor, frame.e)
        } else {
            false
        };
    }

    let part_id = search.pi[frame.part];
    let right = frame.part == 0 || search.pi[frame.part - 1] < search.pi[frame.part];
    let t_info = if right { frame.right_tag } else { frame.left_tag };
    let (last_ref, last_query) = if right {
        (frame.right_last_ref, frame.right_last_query)
    } else {
        (frame.left_last_ref, frame.left_last_query)
    };
    let query_pos = if right { frame.query_pos_r } else { frame.query_pos_l };
    let query_symbol = query[query_pos as usize];
    let more_in_part = partition[part_id] > 1;

    let deletion_op = t_info != Tag::Substitute && t_info != Tag::Insert;
    let insertion_op = t_info != Tag::Substitute && t_info != Tag::Delete;

    let match_allowed = (more_in_part || search.l[frame.part] <= frame.e)
        && frame.e <= search.u[frame.part]
        && (t_info != Tag::Insert || query_symbol != last_query)
        && (t_info != Tag::Delete || query_symbol != last_ref);
    let extra_error_allowed = frame.e + 1 <= search.u[frame.part];
    let substitution_allowed = extra_error_allowed;
    let insertion_allowed =
        insertion_op && (more_in_part || search.l[frame.part] <= frame.e + 1) && extra_error_allowed;

    if match_allowed || substitution_allowed || deletion_op {
        for (symbol, extended) in step_candidates(cursor, right) {
            if symbol == query_symbol {
                if match_allowed {
                    let next = with_side(frame, right, Tag::Match, Some(symbol), Some(symbol));
                    if recurse_into_edit(search, partition, next, extended, part_id, right, query, delegate) {
                        return true;
                    }
                }
            } else if substitution_allowed {
                let mut next = frame;
                next.e += 1;
                let next = with_side(next, right, Tag::Substitute, Some(symbol), Some(query_symbol));
                if recurse_into_edit(search, partition, next, extended, part_id, right, query, delegate) {
                    return true;
                }
            }

            if deletion_op && extra_error_allowed {
                let mut next = frame;
                next.e += 1;
                let next = with_side(next, right, Tag::Delete, Some(symbol), None);
                if search_next_edit(search, partition, next, extended, query, delegate) {
                    return true;
                }
            }
        }
    }

    if insertion_allowed {
        let mut next = frame;
        next.e += 1;
        let next = with_side(next, right, Tag::Insert, None, Some(query_symbol));
        if recurse_into_edit(search, partition, next, cursor, part_id, right, query, delegate) {
            return true;
        }
    }

    false
}

fn run_search_edit<I: IndexStorage, B: Block>(
    search: &Search,
    cursor: BiCursor<I, B>,
    partition: &[usize],
    query: &[u8],
    delegate: &mut dyn FnMut(BiCursor<I, B>, usize) -> bool,
) -> bool {
    let mut partition = partition.to_vec();
    let before: usize = partition[..search.pi[0]].iter().sum();

    let frame = Frame {
        part: 0,
        e: 0,
        query_pos_l: before as isize - 1,
        query_pos_r: before as isize,
        left_tag: Tag::Match,
        right_tag: Tag::Match,
        left_last_ref: NO_SYMBOL,
        left_last_query: NO_SYMBOL,
        right_last_ref: NO_SYMBOL,
        right_last_query: NO_SYMBOL,
    };

    search_next_edit(search, &mut partition, frame, cursor, query, delegate)
}

/// Runs every search in `scheme` against `query`, depth-first, invoking `delegate` for each
/// accepted match. `edit` selects Hamming (substitutions only) vs. edit distance
/// (substitutions, insertions, deletions). Stops as soon as `delegate` returns `true`.
///
/// Grounded on `fmc::search_ng25::Search::run`/`search_next`/`search_next_dir`, collapsed into a
/// single recursive function since Rust's call stack already undoes the per-call state changes
/// the original threads through mutable `Restore` guards.
pub(crate) fn run<I: IndexStorage, B: Block>(
    index: &FmIndex<I, B>,
    query: &[u8],
    scheme: &SearchScheme,
    partition: &[usize],
    edit: bool,
    delegate: &mut dyn FnMut(BiCursor<I, B>, usize) -> bool,
) {
    if query.is_empty() || scheme.searches.is_empty() {
        return;
    }

    let Some(dense_query) = query
        .iter()
        .map(|&b| index.alphabet.try_io_to_dense_representation(b))
        .collect::<Option<Vec<u8>>>()
    else {
        return;
    };

    for search in &scheme.searches {
        let cursor = index.bi_cursor_empty();
        let found = if edit {
            run_search_edit(search, cursor, partition, &dense_query, delegate)
        } else {
            run_hamming(search, cursor, partition, &dense_query, delegate)
        };
        if found {
            return;
        }
    }
}

// Hamming mode reuses the same recursion, but with edit-only operations (insert/delete) forced
// off by construction: `search_next` itself only branches into them when invoked through
// `run_search`'s `edit = true` path, so Hamming mode gets its own thin entry point instead of a
// runtime flag threaded through every frame.
fn run_hamming<I: IndexStorage, B: Block>(
    search: &Search,
    cursor: BiCursor<I, B>,
    partition: &[usize],
    query: &[u8],
    delegate: &mut dyn FnMut(BiCursor<I, B>, usize) -> bool,
) -> bool {
    let mut partition = partition.to_vec();
    let before: usize = partition[..search.pi[0]].iter().sum();

    let frame = Frame {
        part: 0,
        e: 0,
        query_pos_l: before as isize - 1,
        query_pos_r: before as isize,
        left_tag: Tag::Match,
        right_tag: Tag::Match,
        left_last_ref: NO_SYMBOL,
        left_last_query: NO_SYMBOL,
        right_last_ref: NO_SYMBOL,
        right_last_query: NO_SYMBOL,
    };

    search_next_hamming(search, &mut partition, frame, cursor, query, delegate)
}

fn search_next_hamming<I: IndexStorage, B: Block>(
    search: &Search,
    partition: &mut [usize],
    frame: Frame,
    cursor: BiCursor<I, B>,
    query: &[u8],
    delegate: &mut dyn FnMut(BiCursor<I, B>, usize) -> bool,
) -> bool {
    if cursor.count() == 0 {
        return false;
    }

    let num_parts = search.num_parts();
    if frame.part == num_parts {
        let last = num_parts - 1;
        return if search.l[last] <= frame.e && frame.e <= search.u[last] {
            delegate(cursor, frame.e)
        } else {
            false
        };
    }

    let part_id = search.pi[frame.part];
    let right = frame.part == 0 || search.pi[frame.part - 1] < search.pi[frame.part];
    let query_pos = if right { frame.query_pos_r } else { frame.query_pos_l };
    let query_symbol = query[query_pos as usize];
    let more_in_part = partition[part_id] > 1;

    let match_allowed =
        (more_in_part || search.l[frame.part] <= frame.e) && frame.e <= search.u[frame.part];
    let substitution_allowed = frame.e + 1 <= search.u[frame.part];

    if !match_allowed && !substitution_allowed {
        return false;
    }

    for (symbol, extended) in step_candidates(cursor, right) {
        let mut next = frame;
        if symbol != query_symbol {
            if !substitution_allowed {
                continue;
            }
            next.e += 1;
        } else if !match_allowed {
            continue;
        }

        if recurse_into_hamming(search, partition, next, extended, part_id, right, query, delegate) {
            return true;
        }
    }

    false
}

#[allow(clippy::too_many_arguments)]
fn recurse_into_hamming<I: IndexStorage, B: Block>(
    search: &Search,
    partition: &mut [usize],
    mut next: Frame,
    cursor: BiCursor<I, B>,
    part_id: usize,
    right: bool,
    query: &[u8],
    delegate: &mut dyn FnMut(BiCursor<I, B>, usize) -> bool,
) -> bool {
    if right {
        next.query_pos_r += 1;
    } else {
        next.query_pos_l -= 1;
    }

    let saved = partition[part_id];
    partition[part_id] -= 1;

    let result = if partition[part_id] == 0 {
        let mut advanced = next;
        advanced.part += 1;
        search_next_hamming(search, partition, advanced, cursor, query, delegate)
    } else {
        search_next_hamming(search, partition, next, cursor, query, delegate)
    };

    partition[part_id] = saved;
    result
}

/// Runs a substitution-only search against a Σ×Σ [`ScoringMatrix`], tracking an *ambiguous* and a
/// *mismatch* error budget independently rather than the single error count used by [`run`].
/// Unlike `run`, this does not take a search scheme or partition: it walks the whole query in one
/// right-extending pass, since the scoring-matrix variant is substitution-only (no indels) and
/// therefore has no use for the partitioned backtracking schedule.
pub(crate) fn run_with_scoring_matrix<I: IndexStorage, B: Block>(
    index: &FmIndex<I, B>,
    query: &[u8],
    matrix: &ScoringMatrix,
    ambiguous_budget: usize,
    mismatch_budget: usize,
    delegate: &mut dyn FnMut(BiCursor<I, B>, usize, usize) -> bool,
) {
    if query.is_empty() {
        return;
    }

    let Some(dense_query) = query
        .iter()
        .map(|&b| index.alphabet.try_io_to_dense_representation(b))
        .collect::<Option<Vec<u8>>>()
    else {
        return;
    };

    let cursor = index.bi_cursor_empty();
    scoring_step(
        &dense_query,
        0,
        cursor,
        matrix,
        ambiguous_budget,
        mismatch_budget,
        0,
        0,
        delegate,
    );
}

#[allow(clippy::too_many_arguments)]
fn scoring_step<I: IndexStorage, B: Block>(
    query: &[u8],
    pos: usize,
    cursor: BiCursor<I, B>,
    matrix: &ScoringMatrix,
    ambiguous_left: usize,
    mismatch_left: usize,
    ambiguous_used: usize,
    mismatch_used: usize,
    delegate: &mut dyn FnMut(BiCursor<I, B>, usize, usize) -> bool,
) -> bool {
    if cursor.count() == 0 {
        return false;
    }
    if pos == query.len() {
        return delegate(cursor, ambiguous_used, mismatch_used);
    }

    let query_symbol = query[pos];
    for (symbol, extended) in step_candidates(cursor, true) {
        let stepped = match matrix.classify(symbol, query_symbol) {
            0 => Some((ambiguous_left, mismatch_left, ambiguous_used, mismatch_used)),
            1 if ambiguous_left > 0 => {
                Some((ambiguous_left - 1, mismatch_left, ambiguous_used + 1, mismatch_used))
            }
            2.. if mismatch_left > 0 => {
                Some((ambiguous_left, mismatch_left - 1, ambiguous_used, mismatch_used + 1))
            }
            _ => None,
        };

        let Some((a_left, m_left, a_used, m_used)) = stepped else {
            continue;
        };

        if scoring_step(
            query,
            pos + 1,
            extended,
            matrix,
            a_left,
            m_left,
            a_used,
            m_used,
            delegate,
        ) {
            return true;
        }
    }

    false
}
