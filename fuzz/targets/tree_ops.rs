#![no_main]

use std::collections::BTreeMap;

use arbitrary::Arbitrary;
use avldb::{IndexedDatabase, Record};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Op {
    Insert { key: String, value: i16 },
    Delete { value: i16 },
    Search { value: i16 },
    Range { start: i16, end: i16 },
    Clear,
}

fuzz_target!(|ops: Vec<Op>| {
    let mut db = IndexedDatabase::new();
    let mut model: BTreeMap<i64, String> = BTreeMap::new();

    for op in ops {
        match op {
            Op::Insert { key, value } => {
                let value = i64::from(value);
                let inserted = db.insert(Record::new(key.clone(), value));
                assert_eq!(inserted, !model.contains_key(&value));
                model.entry(value).or_insert(key);
            }
            Op::Delete { value } => {
                let value = i64::from(value);
                let removed = db.delete("", value).map(|r| r.into_parts().0);
                assert_eq!(removed, model.remove(&value));
            }
            Op::Search { value } => {
                let value = i64::from(value);
                let found = db.search("", value).map(|r| r.key().to_string());
                assert_eq!(found.as_ref(), model.get(&value));
            }
            Op::Range { start, end } => {
                let (start, end) = (i64::from(start), i64::from(end));
                let got: Vec<i64> = db
                    .range_query(start, end)
                    .into_iter()
                    .map(Record::value)
                    .collect();
                let expected: Vec<i64> = if start <= end {
                    model.range(start..=end).map(|(v, _)| *v).collect()
                } else {
                    Vec::new()
                };
                assert_eq!(got, expected);
            }
            Op::Clear => {
                db.clear();
                model.clear();
            }
        }

        // Любая последовательность операций сохраняет инварианты.
        if let Err(e) = db.check_consistency() {
            panic!("index invariant broken: {e}");
        }
        assert_eq!(db.len(), model.len());
    }
});
