/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The media type grammar.
//!
//! <https://mimesniff.spec.whatwg.org/#parsing-a-mime-type>

use crate::{MimeType, MimeTypeError, MimeTypeParameters};

/// HTTP whitespace: space, tab, line feed, carriage return.
pub(crate) fn is_http_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

/// <https://mimesniff.spec.whatwg.org/#http-token-code-point>
pub(crate) fn is_http_token_code_point(c: char) -> bool {
    c.is_ascii_alphanumeric() ||
        matches!(
            c,
            '!' | '#' | '$' | '%' | '&' | '\'' | '*' | '+' | '-' | '.' | '^' | '_' | '`' | '|' |
                '~'
        )
}

pub(crate) fn solely_http_token_code_points(s: &str) -> bool {
    s.chars().all(is_http_token_code_point)
}

/// <https://mimesniff.spec.whatwg.org/#http-quoted-string-token-code-point>
pub(crate) fn is_http_quoted_string_token_code_point(c: char) -> bool {
    matches!(c, '\t' | '\u{20}'..='\u{7E}' | '\u{80}'..='\u{FF}')
}

pub(crate) fn solely_http_quoted_string_token_code_points(s: &str) -> bool {
    s.chars().all(is_http_quoted_string_token_code_point)
}

pub(crate) fn parse(input: &str) -> Result<MimeType, MimeTypeError> {
    let input: Vec<char> = input.trim_matches(is_http_whitespace).chars().collect();
    let mut position = 0;

    let type_ = collect_while(&input, &mut position, |c| c != '/');
    if type_.is_empty() || !solely_http_token_code_points(&type_) || position >= input.len() {
        return Err(MimeTypeError::Grammar);
    }
    position += 1; // past "/"

    let mut subtype = collect_while(&input, &mut position, |c| c != ';');
    trim_trailing_http_whitespace(&mut subtype);
    if subtype.is_empty() || !solely_http_token_code_points(&subtype) {
        return Err(MimeTypeError::Grammar);
    }

    let mut mime_type = MimeType::new(&type_, &subtype)?;
    parse_parameters(&input, &mut position, mime_type.parameters_mut());
    Ok(mime_type)
}

fn parse_parameters(input: &[char], position: &mut usize, parameters: &mut MimeTypeParameters) {
    while *position < input.len() {
        *position += 1; // past ";"
        skip_while(input, position, is_http_whitespace);

        let mut name = collect_while(input, position, |c| c != ';' && c != '=');
        name.make_ascii_lowercase();

        if *position < input.len() {
            if input[*position] == ';' {
                continue;
            }
            *position += 1; // past "="
        }
        if *position >= input.len() {
            break;
        }

        let value = if input[*position] == '"' {
            let value = collect_http_quoted_string(input, position);
            // Anything between the closing quote and the next ";" is garbage.
            skip_while(input, position, |c| c != ';');
            value
        } else {
            let mut value = collect_while(input, position, |c| c != ';');
            trim_trailing_http_whitespace(&mut value);
            if value.is_empty() {
                continue;
            }
            value
        };

        if !name.is_empty() &&
            solely_http_token_code_points(&name) &&
            solely_http_quoted_string_token_code_points(&value)
        {
            parameters.insert_parsed(name, value);
        }
    }
}

/// The extract-value variant of collecting an HTTP quoted string. Expects
/// `position` to sit on the opening quote; leaves it just past the closing
/// quote, or at the end of input for an unterminated string.
///
/// <https://fetch.spec.whatwg.org/#collect-an-http-quoted-string>
fn collect_http_quoted_string(input: &[char], position: &mut usize) -> String {
    let mut value = String::new();
    *position += 1; // past the opening quote
    loop {
        while *position < input.len() && input[*position] != '"' && input[*position] != '\\' {
            value.push(input[*position]);
            *position += 1;
        }
        if *position >= input.len() {
            break;
        }

        let quote_or_backslash = input[*position];
        *position += 1;

        if quote_or_backslash == '\\' {
            if *position >= input.len() {
                value.push('\\');
                break;
            }
            value.push(input[*position]);
            *position += 1;
        } else {
            break;
        }
    }
    value
}

fn collect_while(input: &[char], position: &mut usize, predicate: impl Fn(char) -> bool) -> String {
    let start = *position;
    while *position < input.len() && predicate(input[*position]) {
        *position += 1;
    }
    input[start..*position].iter().collect()
}

fn skip_while(input: &[char], position: &mut usize, predicate: impl Fn(char) -> bool) {
    while *position < input.len() && predicate(input[*position]) {
        *position += 1;
    }
}

fn trim_trailing_http_whitespace(s: &mut String) {
    s.truncate(s.trim_end_matches(is_http_whitespace).len());
}
