use subdex::{FmIndexConfig, Hit, alphabet};
use std::collections::HashSet;

fn create_index() -> subdex::FmIndex<i32> {
    let text = b"cccaaagggttt".as_slice();

    FmIndexConfig::<i32>::new()
        .suffix_array_sampling_rate(3)
        .construct_index([text], alphabet::ascii_dna())
        .unwrap()
}

fn create_index_u32() -> subdex::FmIndex<u32> {
    let text = b"cccaaagggttt".as_slice();

    FmIndexConfig::<u32>::new()
        .suffix_array_sampling_rate(3)
        .construct_index([text], alphabet::ascii_dna())
        .unwrap()
}

static BASIC_QUERY: &[u8] = b"gg";
static FRONT_QUERY: &[u8] = b"c";
static WRAPPING_QUERY: &[u8] = b"ta";
static MULTI_QUERY: &[u8] = b"gt";

#[test]
fn basic_search() {
    let index = create_index();
    let index_u32 = create_index_u32();

    let results: HashSet<_> = index.locate(BASIC_QUERY).collect();
    let results_u32: HashSet<_> = index_u32.locate(BASIC_QUERY).collect();

    let expected_results = HashSet::from_iter([
        Hit {
            text_id: 0,
            position: 6,
        },
        Hit {
            text_id: 0,
            position: 7,
        },
    ]);

    assert_eq!(results, expected_results);
    assert_eq!(results_u32, expected_results);
}

#[test]
fn text_front_search() {
    let index = create_index();
    let index_u32 = create_index_u32();

    let results: HashSet<_> = index.locate(FRONT_QUERY).collect();
    let results_u32: HashSet<_> = index_u32.locate(FRONT_QUERY).collect();

    let expected_results = HashSet::from_iter([
        Hit {
            text_id: 0,
            position: 0,
        },
        Hit {
            text_id: 0,
            position: 1,
        },
        Hit {
            text_id: 0,
            position: 2,
        },
    ]);

    assert_eq!(results, expected_results);
    assert_eq!(results_u32, expected_results);
}

#[test]
fn search_no_wrapping() {
    let index = create_index();
    let index_u32 = create_index_u32();

    let results: HashSet<_> = index.locate(WRAPPING_QUERY).collect();
    let results_u32: HashSet<_> = index_u32.locate(WRAPPING_QUERY).collect();

    assert!(results.is_empty());
    assert!(results_u32.is_empty());
}

#[test]
fn search_multitext() {
    let texts = [b"cccaaagggttt".as_slice(), b"acgtacgtacgt"];

    let index = FmIndexConfig::<u32>::new()
        .suffix_array_sampling_rate(3)
        .construct_index(texts, alphabet::ascii_dna())
        .unwrap();

    let expected_results_basic_query = HashSet::from_iter([
        Hit {
            text_id: 0,
            position: 6,
        },
        Hit {
            text_id: 0,
            position: 7,
        },
    ]);

    let results_basic_query: HashSet<_> = index.locate(BASIC_QUERY).collect();
    assert_eq!(results_basic_query, expected_results_basic_query);

    let expected_results_multi_query = HashSet::from_iter([
        Hit {
            text_id: 0,
            position: 8,
        },
        Hit {
            text_id: 1,
            position: 2,
        },
        Hit {
            text_id: 1,
            position: 6,
        },
        Hit {
            text_id: 1,
            position: 10,
        },
    ]);

    let results_multi_query: HashSet<_> = index.locate(MULTI_QUERY).collect();
    assert_eq!(results_multi_query, expected_results_multi_query);
}
