//! Fixture curriculum: two A1 lessons and one A2 lesson.

use serde_json::json;
use std::path::Path;

fn write(root: &Path, kind: &str, level: &str, value: serde_json::Value) {
    let dir = root.join("content").join(kind);
    std::fs::create_dir_all(&dir).expect("create content dir");
    std::fs::write(dir.join(format!("{level}.json")), value.to_string()).expect("write content");
}

pub fn write_curriculum(root: &Path) {
    write(
        root,
        "vocabulary",
        "A1",
        json!([
            { "id": 1, "german": "Haus", "english": "house", "article": "das", "type": "noun" },
            { "id": 2, "german": "gehen", "english": "to go", "type": "verb" },
            { "id": 3, "german": "gut", "english": "good" },
            { "word": "Brot", "meaning_tr": "ekmek" }
        ]),
    );
    write(
        root,
        "vocabulary",
        "A2",
        json!([{ "id": 20, "german": "Erfahrung", "english": "experience" }]),
    );
    write(
        root,
        "sentences",
        "A1",
        json!([
            { "id": 100, "german_sentence": "Das Haus ist groß.", "english_translation": "The house is big." },
            { "id": "101", "de": "Ich gehe nach Hause.", "en": "I am going home." }
        ]),
    );
    write(
        root,
        "lessons",
        "A1",
        json!({
            "lessons": [
                {
                    "lesson_id": "A1_L01",
                    "level": "A1",
                    "title": "Zu Hause",
                    "grammar_focus": "Artikel",
                    "vocab_ids": [1, 2],
                    "sentence_ids": ["100"]
                },
                {
                    "lesson_id": "A1_L02",
                    "level": "A1",
                    "title": "Unterwegs",
                    "vocab_ids": [3],
                    "sentence_ids": [101]
                }
            ]
        }),
    );
    write(
        root,
        "lessons",
        "A2",
        json!([{ "lesson_id": "A2_L01", "level": "A2", "title": "Erfahrungen", "vocab_ids": [20] }]),
    );
}
