#![allow(dead_code)]

use std::path::{Path, PathBuf};

pub fn write_corpus(dir: &Path, docs: &[&str]) -> Vec<PathBuf> {
    std::fs::create_dir_all(dir).unwrap();
    docs.iter()
        .enumerate()
        .map(|(i, doc)| {
            let path = dir.join(format!("cv{i:03}.txt"));
            std::fs::write(&path, doc).unwrap();
            path
        })
        .collect()
}

pub fn positive_reviews() -> Vec<&'static str> {
    vec![
        "a wonderful moving film\nthe cast is great",
        "wonderful acting and a great cast",
        "great fun and a wonderful story",
        "a great and moving story",
        "the finest film of the year\nwonderful",
        "moving and great",
    ]
}

pub fn negative_reviews() -> Vec<&'static str> {
    vec![
        "a dull and boring film\nthe plot is awful",
        "awful acting and a boring cast",
        "boring plot and dull pacing",
        "an awful waste of time",
        "the worst film of the year\nboring",
        "dull and awful",
    ]
}

pub fn crawl_json() -> &'static str {
    r#"[
        {"link": "https://health.example/flu", "date": "2014-01-02", "title": "Flu season",
         "body": ["The flu vaccine protects you. The flu vaccine is safe for most adults.",
                  "Get the flu vaccine today at any clinic."]},
        {"link": "https://health.example/parking", "date": "2014-01-03", "title": "Parking",
         "body": ["Parking is available downstairs. The garage opens at six."]},
        {"link": "https://health.example/hours", "date": "2014-01-04", "title": "Hours",
         "body": ["The clinic opens at nine. Walk in visits are welcome."]}
    ]"#
}
