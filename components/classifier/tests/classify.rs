/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use mime::{MimeType, MimeTypeError};
use mime_classifier::{
    computed_mime_type, ApacheBugFlag, MimeClassifier, NoSniffFlag, SniffOpts, SuppliedType,
};

fn sniff(data: &[u8]) -> String {
    computed_mime_type(data, SniffOpts::default())
        .unwrap()
        .essence()
}

fn sniff_with_header(data: &[u8], header: &str) -> String {
    computed_mime_type(
        data,
        SniffOpts {
            content_type_header: Some(header.into()),
            ..Default::default()
        },
    )
    .unwrap()
    .essence()
}

fn sniff_with_provided(data: &[u8], provided: &str) -> String {
    computed_mime_type(
        data,
        SniffOpts {
            provided_type: Some(provided.into()),
            ..Default::default()
        },
    )
    .unwrap()
    .essence()
}

const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

#[test]
fn test_validate() {
    assert!(MimeClassifier::default().validate().is_ok());
}

#[test]
fn test_sniff_image_signatures() {
    assert_eq!(sniff(PNG), "image/png");
    assert_eq!(sniff(&[0xFF, 0xD8, 0xFF]), "image/jpeg");
    assert_eq!(sniff(b"GIF87a"), "image/gif");
    assert_eq!(sniff(b"GIF89a"), "image/gif");
    assert_eq!(sniff(b"RIFF\x12\x34\x56\x78WEBPVP8 "), "image/webp");
    assert_eq!(sniff(b"BM"), "image/bmp");
    assert_eq!(sniff(&[0x00, 0x00, 0x01, 0x00]), "image/x-icon");
    assert_eq!(sniff(&[0x00, 0x00, 0x02, 0x00]), "image/x-icon");
}

#[test]
fn test_sniff_audio_video_signatures() {
    assert_eq!(sniff(b"ID3"), "audio/mpeg");
    assert_eq!(sniff(b"OggS\x00"), "application/ogg");
    assert_eq!(sniff(b"MThd\x00\x00\x00\x06"), "audio/midi");
    assert_eq!(sniff(b"RIFF\x00\x00\x00\x00WAVEfmt "), "audio/wave");
    assert_eq!(sniff(b"FORM\x00\x00\x00\x00AIFF"), "audio/aiff");
    assert_eq!(sniff(b"RIFF\x00\x00\x00\x00AVI "), "video/avi");
}

#[test]
fn test_sniff_archive_signatures() {
    assert_eq!(sniff(b"PK\x03\x04"), "application/zip");
    assert_eq!(sniff(&[0x1F, 0x8B, 0x08]), "application/x-gzip");
    assert_eq!(
        sniff(&[0x52, 0x61, 0x72, 0x21, 0x1A, 0x07, 0x00]),
        "application/x-rar-compressed"
    );
}

#[test]
fn test_sniff_scriptable_signatures() {
    assert_eq!(sniff(b"<html>"), "text/html");
    assert_eq!(sniff(b"<HTML "), "text/html");
    assert_eq!(sniff(b"  \t\n<div>"), "text/html");
    assert_eq!(sniff(b"<!DOCTYPE html>"), "text/html");
    assert_eq!(sniff(b"<!-- comment"), "text/html");
    assert_eq!(sniff(b"<body>"), "text/html");
    assert_eq!(sniff(b"<?xml version='1.0'?>"), "text/xml");
    assert_eq!(sniff(b" <?xml"), "text/xml");
    assert_eq!(sniff(b"%PDF-1.4"), "application/pdf");
    // A tag with no terminating byte is not enough.
    assert_eq!(sniff(b"<html"), "text/plain");
}

#[test]
fn test_sniff_text_or_binary() {
    assert_eq!(sniff(b"Hello, world!"), "text/plain");
    assert_eq!(sniff(b""), "text/plain");
    assert_eq!(sniff(&[0x00, 0x01, 0x02, 0x03]), "application/octet-stream");
    // ESC is not a binary data byte.
    assert_eq!(sniff(b"\x1B[1mbold"), "text/plain");
    // Byte order marks win over the binary check.
    assert_eq!(sniff(&[0xEF, 0xBB, 0xBF, 0x00]), "text/plain");
    assert_eq!(sniff(&[0xFF, 0xFE]), "text/plain");
    assert_eq!(sniff(&[0xFE, 0xFF]), "text/plain");
}

#[test]
fn test_sniff_postscript() {
    assert_eq!(sniff(b"%!PS-Adobe-3.0"), "application/postscript");
}

#[test]
fn test_truncation_to_resource_header() {
    // Bytes past the sniffing window must not influence the result.
    let mut data = vec![b'a'; 1600];
    data[1500] = 0x00;
    assert_eq!(sniff(&data), "text/plain");

    data[100] = 0x00;
    assert_eq!(sniff(&data), "application/octet-stream");
}

#[test]
fn test_supplied_html_and_xml_types_win() {
    assert_eq!(sniff_with_header(PNG, "text/html"), "text/html");
    assert_eq!(sniff_with_header(PNG, "text/xml"), "text/xml");
    assert_eq!(sniff_with_header(PNG, "application/xml"), "application/xml");
    assert_eq!(sniff_with_header(PNG, "image/svg+xml"), "image/svg+xml");
    // "image/xml" is not an XML type; it is an image type and gets sniffed.
    assert_eq!(sniff_with_header(PNG, "image/xml"), "image/png");
}

#[test]
fn test_supplied_unknown_types_sniff() {
    assert_eq!(sniff_with_header(PNG, "unknown/unknown"), "image/png");
    assert_eq!(sniff_with_header(PNG, "application/unknown"), "image/png");
    assert_eq!(sniff_with_header(PNG, "*/*"), "image/png");
}

#[test]
fn test_no_sniff_returns_supplied_type() {
    let result = computed_mime_type(
        PNG,
        SniffOpts {
            content_type_header: Some("text/plain".into()),
            no_sniff: true,
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(result.essence(), "text/plain");
}

#[test]
fn test_no_sniff_still_sniffs_unknown_types() {
    let result = computed_mime_type(
        PNG,
        SniffOpts {
            content_type_header: Some("unknown/unknown".into()),
            no_sniff: true,
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(result.essence(), "image/png");

    // But scriptable sniffing is off, so markup falls through to text.
    let result = computed_mime_type(
        b"<html>",
        SniffOpts {
            content_type_header: Some("unknown/unknown".into()),
            no_sniff: true,
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(result.essence(), "text/plain");
}

#[test]
fn test_no_sniff_does_not_affect_html_types() {
    let result = computed_mime_type(
        PNG,
        SniffOpts {
            content_type_header: Some("text/html".into()),
            no_sniff: true,
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(result.essence(), "text/html");
}

#[test]
fn test_apache_bug_text_plain_header() {
    assert_eq!(sniff_with_header(b"Hello, world!", "text/plain"), "text/plain");
    assert_eq!(
        sniff_with_header(&[0x00, 0x00, 0x00, 0x00], "text/plain; charset=ISO-8859-1"),
        "application/octet-stream"
    );
    assert_eq!(
        sniff_with_header(&[0x00, 0x01], "text/plain; charset=UTF-8"),
        "application/octet-stream"
    );
    assert_eq!(
        sniff_with_header(&[0x00, 0x01], "text/plain; charset=us-ascii"),
        "application/octet-stream"
    );
}

#[test]
fn test_apache_bug_does_not_cover_other_charsets() {
    // A charset outside the legacy set is trusted as-is.
    assert_eq!(
        sniff_with_header(&[0x00, 0x01], "text/plain; charset=gbk"),
        "text/plain"
    );
    // Nor does the carve-out apply to other text types.
    assert_eq!(sniff_with_header(PNG, "text/csv"), "text/csv");
}

#[test]
fn test_supplied_image_type_is_sniffed() {
    assert_eq!(sniff_with_header(PNG, "image/gif"), "image/png");
    assert_eq!(
        sniff_with_header(&[0x00, 0x00, 0x00, 0x00], "image/gif"),
        "image/gif"
    );
}

#[test]
fn test_supplied_audio_video_type_is_sniffed() {
    assert_eq!(sniff_with_header(b"ID3", "audio/aiff"), "audio/mpeg");
    assert_eq!(
        sniff_with_header(&[0x00, 0x00, 0x00, 0x00], "video/avi"),
        "video/avi"
    );
}

#[test]
fn test_supplied_font_type_is_sniffed() {
    assert_eq!(
        sniff_with_header(b"OTTOabcd", "font/ttf"),
        "application/font-sfnt"
    );
    assert_eq!(
        sniff_with_header(b"wOFFabcd", "application/font-woff"),
        "application/font-woff"
    );
}

#[test]
fn test_supplied_archive_type_is_sniffed() {
    assert_eq!(
        sniff_with_header(b"PK\x03\x04", "application/x-rar-compressed"),
        "application/zip"
    );
}

#[test]
fn test_is_supported_gates_sniffing() {
    let unsupported = |_: &MimeType| false;
    let result = computed_mime_type(
        PNG,
        SniffOpts {
            content_type_header: Some("image/webp".into()),
            is_supported: Some(&unsupported),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(result.essence(), "image/webp");

    let webp_only = |mime_type: &MimeType| mime_type.subtype() == "webp";
    let result = computed_mime_type(
        PNG,
        SniffOpts {
            content_type_header: Some("image/webp".into()),
            is_supported: Some(&webp_only),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(result.essence(), "image/png");
}

#[test]
fn test_provided_type_is_sniffed_but_skips_apache_bug() {
    assert_eq!(sniff_with_provided(PNG, "image/gif"), "image/png");
    // No Apache-bug handling: a provided text/plain stays text/plain even
    // over binary content.
    assert_eq!(
        sniff_with_provided(&[0x00, 0x01, 0x02, 0x03], "text/plain"),
        "text/plain"
    );
    assert_eq!(
        sniff_with_provided(&[0x00, 0x00, 0x00, 0x00], "text/css"),
        "text/css"
    );
}

#[test]
fn test_supplied_type_accepts_parsed_records() {
    let header: MimeType = "text/html; charset=utf-8".parse().unwrap();
    let result = computed_mime_type(
        PNG,
        SniffOpts {
            content_type_header: Some(SuppliedType::from(&header)),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(result.essence(), "text/html");
    assert_eq!(result.parameters().get("charset"), Some("utf-8"));
}

#[test]
fn test_malformed_supplied_type_fails_the_call() {
    let result = computed_mime_type(
        PNG,
        SniffOpts {
            content_type_header: Some("asdf".into()),
            ..Default::default()
        },
    );
    assert_eq!(result.unwrap_err(), MimeTypeError::Grammar);

    let result = computed_mime_type(
        PNG,
        SniffOpts {
            provided_type: Some("also bad".into()),
            ..Default::default()
        },
    );
    assert_eq!(result.unwrap_err(), MimeTypeError::Grammar);
}

#[test]
fn test_parameters_survive_when_supplied_type_is_returned() {
    let result = computed_mime_type(
        &[0x00, 0x00, 0x00, 0x00],
        SniffOpts {
            content_type_header: Some("text/css; charset=utf-8".into()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(result.essence(), "text/css");
    assert_eq!(result.parameters().get("charset"), Some("utf-8"));

    // A sniffed result carries no parameters.
    let result = computed_mime_type(PNG, SniffOpts::default()).unwrap();
    assert_eq!(result.essence(), "image/png");
    assert!(result.parameters().is_empty());
}

#[test]
fn test_supplied_type_is_canonicalized() {
    let result = computed_mime_type(
        PNG,
        SniffOpts {
            content_type_header: Some("TEXT/HTML; CHARSET=utf-8".into()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(result.type_(), "text");
    assert_eq!(result.subtype(), "html");
    assert_eq!(result.parameters().get("charset"), Some("utf-8"));
}

#[test]
fn test_sniffing_is_deterministic() {
    let first = computed_mime_type(PNG, SniffOpts::default()).unwrap();
    let second = computed_mime_type(PNG, SniffOpts::default()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_classify_directly_with_flags() {
    let classifier = MimeClassifier::default();
    let gif: MimeType = "image/gif".parse().unwrap();

    let computed = classifier.classify(
        NoSniffFlag::Off,
        ApacheBugFlag::Off,
        Some(&gif),
        &|_: &MimeType| true,
        PNG,
    );
    assert_eq!(computed.essence(), "image/png");

    let computed = classifier.classify(
        NoSniffFlag::On,
        ApacheBugFlag::Off,
        Some(&gif),
        &|_: &MimeType| true,
        PNG,
    );
    assert_eq!(computed.essence(), "image/gif");

    let computed = classifier.classify(
        NoSniffFlag::Off,
        ApacheBugFlag::On,
        Some(&gif),
        &|_: &MimeType| true,
        b"plain enough",
    );
    assert_eq!(computed.essence(), "text/plain");
}

#[test]
fn test_apache_bug_flag_derivation() {
    let from = |s: &str| ApacheBugFlag::from_content_type(&s.parse().unwrap());
    assert_eq!(from("text/plain"), ApacheBugFlag::On);
    assert_eq!(from("text/plain; charset=ISO-8859-1"), ApacheBugFlag::On);
    assert_eq!(from("text/plain; charset=iso-8859-1"), ApacheBugFlag::On);
    assert_eq!(from("text/plain; charset=UTF-8"), ApacheBugFlag::On);
    assert_eq!(from("text/plain; charset=us-ascii"), ApacheBugFlag::On);
    assert_eq!(from("text/plain; charset=gbk"), ApacheBugFlag::Off);
    assert_eq!(from("text/plain; charset=utf-8; x=1"), ApacheBugFlag::Off);
    assert_eq!(from("text/html"), ApacheBugFlag::Off);
}
