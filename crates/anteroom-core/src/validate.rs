// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Form input validation and sanitization for the signup flow.

/// Structural email check: non-empty local part, a single `@`, and a domain
/// containing at least one interior dot.  No whitespace anywhere.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(|c| c.is_whitespace()) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    // At least one dot with a character on both sides ('.' is one byte).
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Indian mobile number: exactly ten digits, first digit 6-9.
/// Spaces are ignored so "98765 43210" is accepted.
pub fn is_valid_phone(phone: &str) -> bool {
    let digits: Vec<char> = phone.chars().filter(|c| !c.is_whitespace()).collect();
    digits.len() == 10
        && matches!(digits[0], '6'..='9')
        && digits[1..].iter().all(|c| c.is_ascii_digit())
}

/// Whether the value has any non-whitespace content.
pub fn is_not_empty(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Escape HTML metacharacters so stored free text can be re-displayed safely.
pub fn sanitize_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            _ => out.push(c),
        }
    }
    out
}
