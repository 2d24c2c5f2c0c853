/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Media type records as defined by the WHATWG MIME Sniffing standard:
//! an essence (`type/subtype`) plus an ordered parameter list, together with
//! the grammar parser and serializer for their string form.
//!
//! <https://mimesniff.spec.whatwg.org/#understanding-mime-types>

#![deny(unsafe_code)]

mod parser;

use std::error::Error;
use std::fmt::{self, Write};
use std::str::FromStr;

use indexmap::IndexMap;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Failures surfaced by media type construction and mutation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MimeTypeError {
    /// The input did not conform to the media type grammar.
    Grammar,
    /// A parameter name was empty or contained code points outside the HTTP
    /// token set.
    InvalidParameterName,
    /// A parameter value contained code points outside the HTTP
    /// quoted-string token set.
    InvalidParameterValue,
}

impl fmt::Display for MimeTypeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MimeTypeError::Grammar => write!(f, "string did not parse as a MIME type"),
            MimeTypeError::InvalidParameterName => {
                write!(f, "parameter names must be non-empty HTTP tokens")
            },
            MimeTypeError::InvalidParameterValue => write!(
                f,
                "parameter values may only contain HTTP quoted-string token code points"
            ),
        }
    }
}

impl Error for MimeTypeError {}

/// The ordered parameter list of a [`MimeType`].
///
/// Names are ASCII-lowercased at every entry point and kept unique; values
/// keep their original case. Iteration follows insertion order, which is what
/// the serializer emits.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MimeTypeParameters {
    map: IndexMap<String, String>,
}

impl MimeTypeParameters {
    pub fn new() -> MimeTypeParameters {
        MimeTypeParameters::default()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.map.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(&name.to_ascii_lowercase())
    }

    /// Records a parameter, replacing the value of an existing one in place.
    ///
    /// The map is left untouched when the name is not a non-empty HTTP token
    /// or the value falls outside the HTTP quoted-string token range.
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), MimeTypeError> {
        let name = name.to_ascii_lowercase();
        if name.is_empty() || !parser::solely_http_token_code_points(&name) {
            return Err(MimeTypeError::InvalidParameterName);
        }
        if !parser::solely_http_quoted_string_token_code_points(value) {
            return Err(MimeTypeError::InvalidParameterValue);
        }
        self.map.insert(name, value.to_owned());
        Ok(())
    }

    /// Removes a parameter, preserving the order of the remaining ones.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.map.shift_remove(&name.to_ascii_lowercase())
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.map.values().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Used by the parser, which validates and lowercases up front and wants
    /// first-occurrence-wins semantics for duplicate names.
    pub(crate) fn insert_parsed(&mut self, name: String, value: String) {
        self.map.entry(name).or_insert(value);
    }
}

impl<'a> IntoIterator for &'a MimeTypeParameters {
    type Item = (&'a String, &'a String);
    type IntoIter = indexmap::map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.iter()
    }
}

/// A parsed media type record.
///
/// The essence tokens are held lowercased; parameters live in a
/// [`MimeTypeParameters`] map. Records are plain values: cloning is deep and
/// two records compare equal when their essence and parameter entries match.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MimeType {
    type_: String,
    subtype: String,
    parameters: MimeTypeParameters,
}

impl MimeType {
    /// Creates a record from its two essence tokens, lowercasing both.
    /// Fails when either token is empty or contains a non-token code point.
    pub fn new(type_: &str, subtype: &str) -> Result<MimeType, MimeTypeError> {
        let mut mime_type = MimeType {
            type_: String::new(),
            subtype: String::new(),
            parameters: MimeTypeParameters::new(),
        };
        mime_type.set_type(type_)?;
        mime_type.set_subtype(subtype)?;
        Ok(mime_type)
    }

    /// Parses a media type string, the non-panicking counterpart of
    /// constructing through [`FromStr`].
    ///
    /// <https://mimesniff.spec.whatwg.org/#parsing-a-mime-type>
    pub fn parse(input: &str) -> Result<MimeType, MimeTypeError> {
        parser::parse(input)
    }

    pub fn type_(&self) -> &str {
        &self.type_
    }

    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    /// Replaces the type token; the record is unchanged on failure.
    pub fn set_type(&mut self, type_: &str) -> Result<(), MimeTypeError> {
        if type_.is_empty() || !parser::solely_http_token_code_points(type_) {
            return Err(MimeTypeError::Grammar);
        }
        self.type_ = type_.to_ascii_lowercase();
        Ok(())
    }

    /// Replaces the subtype token; the record is unchanged on failure.
    pub fn set_subtype(&mut self, subtype: &str) -> Result<(), MimeTypeError> {
        if subtype.is_empty() || !parser::solely_http_token_code_points(subtype) {
            return Err(MimeTypeError::Grammar);
        }
        self.subtype = subtype.to_ascii_lowercase();
        Ok(())
    }

    /// The `type/subtype` pair without parameters.
    pub fn essence(&self) -> String {
        format!("{}/{}", self.type_, self.subtype)
    }

    pub fn has_essence(&self, essence: &str) -> bool {
        let (type_, subtype) = match essence.split_once('/') {
            Some(parts) => parts,
            None => return false,
        };
        self.type_ == type_ && self.subtype == subtype
    }

    pub fn parameters(&self) -> &MimeTypeParameters {
        &self.parameters
    }

    pub fn parameters_mut(&mut self) -> &mut MimeTypeParameters {
        &mut self.parameters
    }

    /// <https://mimesniff.spec.whatwg.org/#html-mime-type>
    pub fn is_html(&self) -> bool {
        self.subtype == "html" && self.type_ == "text"
    }

    /// <https://mimesniff.spec.whatwg.org/#xml-mime-type>
    pub fn is_xml(&self) -> bool {
        (self.subtype == "xml" && (self.type_ == "text" || self.type_ == "application")) ||
            self.subtype.ends_with("+xml")
    }

    pub fn is_text(&self) -> bool {
        self.type_ == "text"
    }

    /// <https://mimesniff.spec.whatwg.org/#javascript-mime-type>
    ///
    /// Classification is by essence alone: parameters such as `charset` do
    /// not disqualify a type.
    pub fn is_javascript(&self) -> bool {
        match self.type_.as_str() {
            "application" => matches!(
                self.subtype.as_str(),
                "ecmascript" | "javascript" | "x-ecmascript" | "x-javascript"
            ),
            "text" => matches!(
                self.subtype.as_str(),
                "ecmascript" |
                    "javascript" |
                    "javascript1.0" |
                    "javascript1.1" |
                    "javascript1.2" |
                    "javascript1.3" |
                    "javascript1.4" |
                    "javascript1.5" |
                    "jscript" |
                    "livescript" |
                    "x-ecmascript" |
                    "x-javascript"
            ),
            _ => false,
        }
    }
}

impl FromStr for MimeType {
    type Err = MimeTypeError;

    fn from_str(input: &str) -> Result<MimeType, MimeTypeError> {
        parser::parse(input)
    }
}

/// Serialization per <https://mimesniff.spec.whatwg.org/#serializing-a-mime-type>:
/// the essence, then each parameter in insertion order, quoting values that
/// are empty or contain a non-token code point.
impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.type_, self.subtype)?;
        for (name, value) in self.parameters.iter() {
            write!(f, ";{}=", name)?;
            if !value.is_empty() && parser::solely_http_token_code_points(value) {
                f.write_str(value)?;
            } else {
                f.write_char('"')?;
                for c in value.chars() {
                    if c == '"' || c == '\\' {
                        f.write_char('\\')?;
                    }
                    f.write_char(c)?;
                }
                f.write_char('"')?;
            }
        }
        Ok(())
    }
}

impl Serialize for MimeType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MimeType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<MimeType, D::Error> {
        struct MimeTypeVisitor;

        impl Visitor<'_> for MimeTypeVisitor {
            type Value = MimeType;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a MIME type string")
            }

            fn visit_str<E: de::Error>(self, input: &str) -> Result<MimeType, E> {
                input.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_str(MimeTypeVisitor)
    }
}
