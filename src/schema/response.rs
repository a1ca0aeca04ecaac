//! Structured-output schemas sent with synthesis and drafting calls.
//!
//! These use the API's OpenAPI-subset dialect (`OBJECT`, `ARRAY`, ...), so
//! they are written out by hand rather than derived from the Rust types.

use serde_json::{json, Value};

fn stat_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "label": {"type": "STRING"},
            "value": {"type": "STRING"},
            "context": {"type": "STRING"}
        },
        "required": ["label", "value", "context"]
    })
}

pub fn research_data_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "summary": {"type": "STRING"},
            "ethicalRating": {
                "type": "INTEGER",
                "description": "1 = predatory, 10 = benign"
            },
            "profitPotential": {"type": "STRING"},
            "marketStats": {"type": "ARRAY", "items": stat_schema()},
            "hiddenCosts": {"type": "ARRAY", "items": stat_schema()},
            "caseStudies": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": {"type": "STRING"},
                        "type": {"type": "STRING", "enum": ["WINNER", "LOSER"]},
                        "background": {"type": "STRING"},
                        "strategy": {"type": "STRING"},
                        "outcome": {"type": "STRING"},
                        "revenue": {"type": "STRING"}
                    },
                    "required": ["name", "type", "background", "strategy", "outcome", "revenue"]
                }
            },
            "affiliates": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "program": {"type": "STRING"},
                        "potential": {"type": "STRING"},
                        "type": {"type": "STRING", "enum": ["PARTICIPANT", "WRITER"]},
                        "commission": {"type": "STRING"},
                        "notes": {"type": "STRING"}
                    },
                    "required": ["program", "potential", "type", "commission", "notes"]
                }
            }
        },
        "required": [
            "summary", "ethicalRating", "profitPotential", "marketStats",
            "hiddenCosts", "caseStudies", "affiliates"
        ]
    })
}

fn cover_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "titleText": {"type": "STRING"},
            "subtitleText": {"type": "STRING"},
            "blurb": {"type": "STRING"},
            "visualDescription": {"type": "STRING"}
        },
        "required": ["visualDescription"]
    })
}

pub fn book_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": {"type": "STRING"},
            "subtitle": {"type": "STRING"},
            "frontCover": cover_schema(),
            "backCover": cover_schema(),
            "chapters": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "number": {"type": "INTEGER"},
                        "title": {"type": "STRING"},
                        "content": {"type": "STRING", "description": "Markdown"},
                        "posiBotQuotes": {
                            "type": "ARRAY",
                            "items": {
                                "type": "OBJECT",
                                "properties": {
                                    "position": {"type": "STRING", "enum": ["LEFT", "RIGHT"]},
                                    "text": {"type": "STRING"}
                                },
                                "required": ["position", "text"]
                            }
                        },
                        "visuals": {
                            "type": "ARRAY",
                            "items": {
                                "type": "OBJECT",
                                "properties": {
                                    "type": {
                                        "type": "STRING",
                                        "enum": ["HERO", "CHART", "CALLOUT", "PORTRAIT", "DIAGRAM"]
                                    },
                                    "description": {"type": "STRING"},
                                    "caption": {"type": "STRING"}
                                },
                                "required": ["type", "description"]
                            }
                        }
                    },
                    "required": ["number", "title", "content"]
                }
            }
        },
        "required": ["title", "subtitle", "chapters"]
    })
}
