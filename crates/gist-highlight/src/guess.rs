//! Content heuristics for picking a grammar when no lexer is named.
//!
//! Each candidate lists tell-tale substrings. The candidate with the most hits
//! wins; ties go to the earlier entry. This is a guess, not a parser.

/// (syntax token, signals)
const CANDIDATES: &[(&str, &[&str])] = &[
    ("rs", &["fn ", "let mut ", "impl ", "pub fn", "use std::", "-> ", "::"]),
    ("py", &["def ", "import ", "print(", "self.", "elif ", "__init__", "None"]),
    ("go", &["package ", "func ", ":= ", "fmt.", "import ("]),
    ("js", &["function", "const ", "=> ", "console.log", "require(", "let "]),
    ("rb", &["end\n", "puts ", "require '", "do |", "attr_accessor"]),
    ("cpp", &["#include", "std::", "int main", "nullptr", "template<"]),
    ("java", &["public class", "public static void", "System.out", "private "]),
    ("sh", &["#!/bin/", "echo ", "fi\n", "then\n", "$1", "export "]),
    ("html", &["<html", "<div", "</", "<body", "<!DOCTYPE"]),
    ("sql", &["SELECT ", "FROM ", "WHERE ", "INSERT INTO", "CREATE TABLE"]),
    ("yaml", &["---\n", ": |", "\n- ", "apiVersion:"]),
];

/// Signals needed before a candidate is considered at all.
const MIN_HITS: usize = 2;

/// Guess a syntax token for `content`, or `None` when no candidate is convincing.
pub(crate) fn guess_token(content: &str) -> Option<&'static str> {
    let mut best: Option<(&'static str, usize)> = None;
    for &(token, signals) in CANDIDATES {
        let hits = signals.iter().filter(|s| content.contains(*s)).count();
        if hits >= MIN_HITS && best.is_none_or(|(_, b)| hits > b) {
            best = Some((token, hits));
        }
    }
    best.map(|(token, _)| token)
}
