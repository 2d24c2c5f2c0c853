/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Content sniffing: computes an authoritative MIME type for a resource from
//! its first bytes and an optionally declared type, per the WHATWG MIME
//! Sniffing standard.
//!
//! <https://mimesniff.spec.whatwg.org/>

#![deny(unsafe_code)]

use std::borrow::Cow;
use std::sync::LazyLock;

use log::debug;
use mime::{MimeType, MimeTypeError};

/// The number of bytes of a resource the sniffing algorithms may examine.
/// Longer inputs are truncated before any signature is tried.
///
/// <https://mimesniff.spec.whatwg.org/#resource-header>
const RESOURCE_HEADER_LENGTH: usize = 1445;

pub struct MimeClassifier {
    image_classifier: GroupedClassifier,
    audio_video_classifier: GroupedClassifier,
    scriptable_classifier: GroupedClassifier,
    plaintext_classifier: GroupedClassifier,
    archive_classifier: GroupedClassifier,
    binary_or_plaintext: BinaryOrPlaintextClassifier,
    font_classifier: GroupedClassifier,
}

/// The essence classes a declared type can fall into for sniffing purposes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MediaType {
    Xml,
    Html,
    Image,
    AudioVideo,
    Font,
    Archive,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ApacheBugFlag {
    On,
    Off,
}

impl ApacheBugFlag {
    /// A `text/plain` Content-Type header, bare or with one of the charsets
    /// historically emitted by default server configurations, is distrusted
    /// and re-sniffed as text-or-binary.
    ///
    /// <https://mimesniff.spec.whatwg.org/#supplied-mime-type-detection-algorithm>
    pub fn from_content_type(content_type: &MimeType) -> ApacheBugFlag {
        if content_type.essence() != "text/plain" {
            return ApacheBugFlag::Off;
        }
        let parameters = content_type.parameters();
        if parameters.is_empty() {
            return ApacheBugFlag::On;
        }
        match (parameters.len(), parameters.get("charset")) {
            (1, Some(charset))
                if charset.eq_ignore_ascii_case("iso-8859-1") ||
                    charset.eq_ignore_ascii_case("us-ascii") ||
                    charset.eq_ignore_ascii_case("utf-8") =>
            {
                ApacheBugFlag::On
            },
            _ => ApacheBugFlag::Off,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NoSniffFlag {
    On,
    Off,
}

impl Default for MimeClassifier {
    fn default() -> Self {
        Self {
            image_classifier: GroupedClassifier::image_classifier(),
            audio_video_classifier: GroupedClassifier::audio_video_classifier(),
            scriptable_classifier: GroupedClassifier::scriptable_classifier(),
            plaintext_classifier: GroupedClassifier::plaintext_classifier(),
            archive_classifier: GroupedClassifier::archive_classifier(),
            binary_or_plaintext: BinaryOrPlaintextClassifier,
            font_classifier: GroupedClassifier::font_classifier(),
        }
    }
}

impl MimeClassifier {
    /// Runs the MIME type sniffing algorithm.
    ///
    /// `supplied_type` is the declared type, already resolved to a record;
    /// `is_supported` gates signature sniffing for the declared type's
    /// essence class. The result is total: every input maps to exactly one
    /// type.
    ///
    /// <https://mimesniff.spec.whatwg.org/#mime-type-sniffing-algorithm>
    pub fn classify(
        &self,
        no_sniff_flag: NoSniffFlag,
        apache_bug_flag: ApacheBugFlag,
        supplied_type: Option<&MimeType>,
        is_supported: &dyn Fn(&MimeType) -> bool,
        data: &[u8],
    ) -> MimeType {
        let data = &data[..data.len().min(RESOURCE_HEADER_LENGTH)];

        // Step 2. An absent declared type and the placeholder "unknown"
        // types sniff the same way.
        let supplied_type =
            supplied_type.filter(|mime_type| !MimeClassifier::is_explicit_unknown(mime_type));
        let supplied_type = match supplied_type {
            None => return self.sniff_unknown_type(no_sniff_flag, data),
            Some(supplied_type) => supplied_type,
        };

        // Step 1. HTML and XML declared types are authoritative; no byte of
        // the resource is inspected and parameters survive untouched.
        if supplied_type.is_html() || supplied_type.is_xml() {
            return supplied_type.clone();
        }

        // Step 3. The no-sniff flag pins any other declared type.
        if no_sniff_flag == NoSniffFlag::On {
            return supplied_type.clone();
        }

        // Step 4. A distrusted text/plain header only distinguishes text
        // from binary.
        if apache_bug_flag == ApacheBugFlag::On {
            return self.sniff_text_or_data(data);
        }

        // Steps 5-9. Signature sniffing for the declared essence class,
        // falling back to the declared type when nothing matches.
        let group = match MimeClassifier::get_media_type(supplied_type) {
            Some(MediaType::Image) => Some(&self.image_classifier),
            Some(MediaType::AudioVideo) => Some(&self.audio_video_classifier),
            Some(MediaType::Font) => Some(&self.font_classifier),
            Some(MediaType::Archive) => Some(&self.archive_classifier),
            Some(MediaType::Html) | Some(MediaType::Xml) | None => None,
        };
        group
            .filter(|_| is_supported(supplied_type))
            .and_then(|classifier| classifier.classify(data))
            .unwrap_or_else(|| supplied_type.clone())
    }

    pub fn validate(&self) -> Result<(), String> {
        self.image_classifier.validate()?;
        self.audio_video_classifier.validate()?;
        self.scriptable_classifier.validate()?;
        self.plaintext_classifier.validate()?;
        self.archive_classifier.validate()?;
        self.binary_or_plaintext.validate()?;
        self.font_classifier.validate()?;
        Ok(())
    }

    /// <https://mimesniff.spec.whatwg.org/#rules-for-identifying-an-unknown-mime-type>
    fn sniff_unknown_type(&self, no_sniff_flag: NoSniffFlag, data: &[u8]) -> MimeType {
        let should_sniff_scriptable = no_sniff_flag == NoSniffFlag::Off;
        let sniffed = if should_sniff_scriptable {
            self.scriptable_classifier.classify(data)
        } else {
            None
        };

        sniffed
            .or_else(|| self.plaintext_classifier.classify(data))
            .or_else(|| self.image_classifier.classify(data))
            .or_else(|| self.audio_video_classifier.classify(data))
            .or_else(|| self.archive_classifier.classify(data))
            .or_else(|| self.binary_or_plaintext.classify(data))
            .expect("BinaryOrPlaintextClassifier always succeeds")
    }

    /// <https://mimesniff.spec.whatwg.org/#rules-for-text-or-binary>
    fn sniff_text_or_data(&self, data: &[u8]) -> MimeType {
        self.binary_or_plaintext
            .classify(data)
            .expect("BinaryOrPlaintextClassifier always succeeds")
    }

    /// <https://mimesniff.spec.whatwg.org/#image-mime-type>
    fn is_image(mime_type: &MimeType) -> bool {
        mime_type.type_() == "image"
    }

    /// <https://mimesniff.spec.whatwg.org/#audio-or-video-mime-type>
    fn is_audio_video(mime_type: &MimeType) -> bool {
        mime_type.type_() == "audio" ||
            mime_type.type_() == "video" ||
            mime_type.has_essence("application/ogg")
    }

    /// <https://mimesniff.spec.whatwg.org/#font-mime-type>
    fn is_font(mime_type: &MimeType) -> bool {
        mime_type.type_() == "font" ||
            (mime_type.type_() == "application" &&
                [
                    "font-cff",
                    "font-off",
                    "font-sfnt",
                    "font-ttf",
                    "font-woff",
                    "vnd.ms-fontobject",
                    "vnd.ms-opentype",
                ]
                .contains(&mime_type.subtype()))
    }

    /// <https://mimesniff.spec.whatwg.org/#archive-mime-type>
    fn is_archive(mime_type: &MimeType) -> bool {
        mime_type.type_() == "application" &&
            ["zip", "x-gzip", "x-rar-compressed"].contains(&mime_type.subtype())
    }

    fn is_explicit_unknown(mime_type: &MimeType) -> bool {
        matches!(
            (mime_type.type_(), mime_type.subtype()),
            ("unknown", "unknown") | ("application", "unknown") | ("*", "*")
        )
    }

    pub fn get_media_type(mime_type: &MimeType) -> Option<MediaType> {
        if mime_type.is_xml() {
            Some(MediaType::Xml)
        } else if mime_type.is_html() {
            Some(MediaType::Html)
        } else if MimeClassifier::is_image(mime_type) {
            Some(MediaType::Image)
        } else if MimeClassifier::is_audio_video(mime_type) {
            Some(MediaType::AudioVideo)
        } else if MimeClassifier::is_font(mime_type) {
            Some(MediaType::Font)
        } else if MimeClassifier::is_archive(mime_type) {
            Some(MediaType::Archive)
        } else {
            None
        }
    }
}

/// A declared type at the sniffing boundary: either a raw header value still
/// to be run through the grammar, or an already parsed record.
pub enum SuppliedType<'a> {
    Raw(&'a str),
    Record(&'a MimeType),
}

impl<'a> SuppliedType<'a> {
    fn resolve(&self) -> Result<Cow<'a, MimeType>, MimeTypeError> {
        match *self {
            SuppliedType::Raw(raw) => raw.parse().map(Cow::Owned),
            SuppliedType::Record(record) => Ok(Cow::Borrowed(record)),
        }
    }
}

impl<'a> From<&'a str> for SuppliedType<'a> {
    fn from(raw: &'a str) -> SuppliedType<'a> {
        SuppliedType::Raw(raw)
    }
}

impl<'a> From<&'a MimeType> for SuppliedType<'a> {
    fn from(record: &'a MimeType) -> SuppliedType<'a> {
        SuppliedType::Record(record)
    }
}

/// Options for a single sniffing pass. At most one of `content_type_header`
/// and `provided_type` is meaningful; when both are present the header wins.
#[derive(Default)]
pub struct SniffOpts<'a> {
    /// The type declared by a transport-layer Content-Type header.
    pub content_type_header: Option<SuppliedType<'a>>,
    /// A type supplied through a non-header channel; exempt from the
    /// Apache-bug carve-out.
    pub provided_type: Option<SuppliedType<'a>>,
    /// Disables scriptable sniffing for absent or unknown declared types.
    pub no_sniff: bool,
    /// Gates signature sniffing for the declared type's essence class.
    /// Absent means everything is supported.
    pub is_supported: Option<&'a dyn Fn(&MimeType) -> bool>,
}

static CLASSIFIER: LazyLock<MimeClassifier> = LazyLock::new(MimeClassifier::default);

/// Computes the authoritative type for a resource from its first bytes and
/// an optionally declared type.
///
/// The only failure mode is a declared type string that does not parse;
/// sniffing itself is total over arbitrary byte input, including the empty
/// resource.
pub fn computed_mime_type(
    data: &[u8],
    opts: SniffOpts<'_>,
) -> Result<MimeType, MimeTypeError> {
    let (supplied_type, apache_bug_flag) = match (&opts.content_type_header, &opts.provided_type) {
        (Some(header), _) => {
            let mime_type = header.resolve()?;
            let apache_bug_flag = ApacheBugFlag::from_content_type(&mime_type);
            (Some(mime_type), apache_bug_flag)
        },
        (None, Some(provided)) => (Some(provided.resolve()?), ApacheBugFlag::Off),
        (None, None) => (None, ApacheBugFlag::Off),
    };
    let no_sniff_flag = if opts.no_sniff {
        NoSniffFlag::On
    } else {
        NoSniffFlag::Off
    };

    let always_supported = |_: &MimeType| true;
    let is_supported: &dyn Fn(&MimeType) -> bool = match opts.is_supported {
        Some(predicate) => predicate,
        None => &always_supported,
    };

    let computed = CLASSIFIER.classify(
        no_sniff_flag,
        apache_bug_flag,
        supplied_type.as_deref(),
        is_supported,
        data,
    );
    debug!(
        "computed MIME type {} for a {} byte resource",
        computed,
        data.len()
    );
    Ok(computed)
}

// Interface used for composite matchers.
trait MIMEChecker {
    fn classify(&self, data: &[u8]) -> Option<MimeType>;
    /// Validate the MIME checker configuration
    fn validate(&self) -> Result<(), String>;
}

struct ByteMatcher {
    pattern: &'static [u8],
    mask: &'static [u8],
    leading_ignore: &'static [u8],
    content_type: MimeType,
}

impl ByteMatcher {
    fn matches(&self, data: &[u8]) -> Option<usize> {
        if data.len() < self.pattern.len() {
            None
        } else if data == self.pattern {
            Some(self.pattern.len())
        } else {
            data[..data.len() - self.pattern.len() + 1]
                .iter()
                .position(|x| !self.leading_ignore.contains(x))
                .and_then(|start| {
                    if data[start..]
                        .iter()
                        .zip(self.pattern.iter())
                        .zip(self.mask.iter())
                        .all(|((&data, &pattern), &mask)| (data & mask) == pattern)
                    {
                        Some(start + self.pattern.len())
                    } else {
                        None
                    }
                })
        }
    }
}

impl MIMEChecker for ByteMatcher {
    fn classify(&self, data: &[u8]) -> Option<MimeType> {
        self.matches(data).map(|_| self.content_type.clone())
    }

    fn validate(&self) -> Result<(), String> {
        if self.pattern.is_empty() {
            return Err(format!("Zero length pattern for {}", self.content_type));
        }
        if self.pattern.len() != self.mask.len() {
            return Err(format!(
                "Unequal pattern and mask length for {}",
                self.content_type
            ));
        }
        if self
            .pattern
            .iter()
            .zip(self.mask.iter())
            .any(|(&pattern, &mask)| pattern & mask != pattern)
        {
            return Err(format!("Pattern not pre-masked for {}", self.content_type));
        }
        Ok(())
    }
}

/// An HTML tag signature: the tag name must be followed by a tag-terminating
/// byte for the match to count.
struct TagTerminatedByteMatcher {
    matcher: ByteMatcher,
}

impl MIMEChecker for TagTerminatedByteMatcher {
    fn classify(&self, data: &[u8]) -> Option<MimeType> {
        self.matcher.matches(data).and_then(|j| {
            if j < data.len() && (data[j] == b' ' || data[j] == b'>') {
                Some(self.matcher.content_type.clone())
            } else {
                None
            }
        })
    }

    fn validate(&self) -> Result<(), String> {
        self.matcher.validate()
    }
}

pub struct Mp4Matcher;

impl Mp4Matcher {
    /// <https://mimesniff.spec.whatwg.org/#signature-for-mp4>
    pub fn matches(&self, data: &[u8]) -> bool {
        if data.len() < 12 {
            return false;
        }

        let box_size = u32::from_be_bytes([data[0], data[1], data[2], data[3]]) as usize;
        if box_size < 12 || box_size > data.len() {
            return false;
        }

        if &data[4..8] != b"ftyp" {
            return false;
        }

        let mp4 = [0x6D, 0x70, 0x34];
        if data[8..].starts_with(&mp4) {
            return true;
        }

        // Compatible brands are 4-byte fields following the major brand and
        // its version, up to the end of the box.
        let mut bytes_read = 16;
        while bytes_read + mp4.len() <= box_size {
            if data[bytes_read..].starts_with(&mp4) {
                return true;
            }
            bytes_read += 4;
        }
        false
    }
}

impl MIMEChecker for Mp4Matcher {
    fn classify(&self, data: &[u8]) -> Option<MimeType> {
        if self.matches(data) {
            Some("video/mp4".parse().unwrap())
        } else {
            None
        }
    }

    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

pub struct WebMMatcher;

impl WebMMatcher {
    /// <https://mimesniff.spec.whatwg.org/#signature-for-webm>
    pub fn matches(&self, data: &[u8]) -> bool {
        // An EBML stream opens with the header element id.
        if !data.starts_with(&[0x1A, 0x45, 0xDF, 0xA3]) {
            return false;
        }

        // Look for the DocType element id within the header window.
        let mut iter = 4;
        while iter + 1 < data.len() && iter < 38 {
            if data[iter] == 0x42 && data[iter + 1] == 0x82 {
                iter += 2;
                if iter >= data.len() {
                    return false;
                }

                // The DocType size is an EBML variable-length integer; its
                // first octet encodes how many bytes it occupies.
                let number_size = vint_length(data[iter]);
                if iter + number_size > data.len() {
                    return false;
                }

                let mut index = iter + number_size;
                while index < data.len() && data[index] == 0x00 {
                    index += 1;
                }
                return data[index..].starts_with(b"webm");
            }
            iter += 1;
        }
        false
    }
}

impl MIMEChecker for WebMMatcher {
    fn classify(&self, data: &[u8]) -> Option<MimeType> {
        if self.matches(data) {
            Some("video/webm".parse().unwrap())
        } else {
            None
        }
    }

    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Number of bytes occupied by an EBML variable-length integer, given its
/// first octet: one plus the number of leading zero bits, where an all-zero
/// octet requests the maximum of eight bytes.
fn vint_length(first: u8) -> usize {
    let mut mask = 0x80;
    let mut length = 1;
    while length < 8 && first & mask == 0 {
        mask >>= 1;
        length += 1;
    }
    length
}

pub struct Mp3Matcher;

impl Mp3Matcher {
    /// <https://mimesniff.spec.whatwg.org/#signature-for-mp3-without-id3>
    pub fn matches(&self, data: &[u8]) -> bool {
        let header = match Mp3Frame::parse(data, 0) {
            Some(header) => header,
            None => return false,
        };

        let frame_size = header.frame_size();
        if frame_size < MP3_FRAME_HEADER_SIZE {
            return false;
        }

        // A lone valid header is not evidence enough; require a consistent
        // second frame exactly one frame length later, inside the resource.
        match Mp3Frame::parse(data, frame_size) {
            Some(next) => {
                next.version == header.version && next.sample_rate == header.sample_rate
            },
            None => false,
        }
    }
}

impl MIMEChecker for Mp3Matcher {
    fn classify(&self, data: &[u8]) -> Option<MimeType> {
        if self.matches(data) {
            Some("audio/mpeg".parse().unwrap())
        } else {
            None
        }
    }

    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

const MP3_FRAME_HEADER_SIZE: usize = 4;

// Layer III bit rates in bits per second, indexed by the header's bitrate
// field. Index 0 (free format) and 15 are rejected during parsing.
const MPEG1_BIT_RATES: [u32; 15] = [
    0, 32000, 40000, 48000, 56000, 64000, 80000, 96000, 112000, 128000, 160000, 192000, 224000,
    256000, 320000,
];
const MPEG2_BIT_RATES: [u32; 15] = [
    0, 8000, 16000, 24000, 32000, 40000, 48000, 56000, 64000, 80000, 96000, 112000, 128000,
    144000, 160000,
];

const MPEG1_SAMPLE_RATES: [u32; 3] = [44100, 48000, 32000];
const MPEG2_SAMPLE_RATES: [u32; 3] = [22050, 24000, 16000];
const MPEG2_5_SAMPLE_RATES: [u32; 3] = [11025, 12000, 8000];

/// The fields of an MPEG audio frame header that sniffing needs.
struct Mp3Frame {
    version: u8,
    bitrate: u32,
    sample_rate: u32,
    padding: bool,
}

impl Mp3Frame {
    /// Decodes a frame header at `offset`, or `None` when the four header
    /// bytes do not fit in `data` or any field is reserved or invalid.
    fn parse(data: &[u8], offset: usize) -> Option<Mp3Frame> {
        let header = data.get(offset..offset.checked_add(MP3_FRAME_HEADER_SIZE)?)?;

        // An eleven bit frame sync, all ones.
        if header[0] != 0xFF || header[1] & 0xE0 != 0xE0 {
            return None;
        }

        // 0b00 is MPEG 2.5, 0b10 MPEG 2, 0b11 MPEG 1; 0b01 is reserved.
        let version = (header[1] >> 3) & 0x03;
        if version == 1 {
            return None;
        }

        // Only Layer III frames are sniffed.
        let layer = (header[1] >> 1) & 0x03;
        if layer != 0x01 {
            return None;
        }

        let bitrate_index = header[2] >> 4;
        if bitrate_index == 0 || bitrate_index == 15 {
            return None;
        }

        let sample_rate_index = (header[2] >> 2) & 0x03;
        if sample_rate_index == 3 {
            return None;
        }

        let bitrate = if version == 3 {
            MPEG1_BIT_RATES[bitrate_index as usize]
        } else {
            MPEG2_BIT_RATES[bitrate_index as usize]
        };
        let sample_rate = match version {
            3 => MPEG1_SAMPLE_RATES[sample_rate_index as usize],
            2 => MPEG2_SAMPLE_RATES[sample_rate_index as usize],
            _ => MPEG2_5_SAMPLE_RATES[sample_rate_index as usize],
        };
        let padding = header[2] & 0x02 != 0;

        Some(Mp3Frame {
            version,
            bitrate,
            sample_rate,
            padding,
        })
    }

    /// <https://mimesniff.spec.whatwg.org/#compute-an-mp3-frame-size>
    fn frame_size(&self) -> usize {
        let scale = if self.version == 3 { 144 } else { 72 };
        let size = scale * self.bitrate / self.sample_rate;
        size as usize + self.padding as usize
    }
}

struct BinaryOrPlaintextClassifier;

impl BinaryOrPlaintextClassifier {
    /// <https://mimesniff.spec.whatwg.org/#rules-for-text-or-binary>
    fn classify_impl(&self, data: &[u8]) -> MimeType {
        if data.starts_with(&[0xFF, 0xFE]) ||
            data.starts_with(&[0xFE, 0xFF]) ||
            data.starts_with(&[0xEF, 0xBB, 0xBF])
        {
            "text/plain".parse().unwrap()
        } else if data.iter().any(|&x| {
            x <= 0x08 || x == 0x0B || (0x0E..=0x1A).contains(&x) || (0x1C..=0x1F).contains(&x)
        }) {
            "application/octet-stream".parse().unwrap()
        } else {
            "text/plain".parse().unwrap()
        }
    }
}

impl MIMEChecker for BinaryOrPlaintextClassifier {
    fn classify(&self, data: &[u8]) -> Option<MimeType> {
        Some(self.classify_impl(data))
    }

    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

struct GroupedClassifier {
    byte_matchers: Vec<Box<dyn MIMEChecker + Send + Sync>>,
}

impl GroupedClassifier {
    fn image_classifier() -> GroupedClassifier {
        GroupedClassifier {
            byte_matchers: vec![
                Box::new(ByteMatcher::image_png()),
                Box::new(ByteMatcher::image_jpeg()),
                Box::new(ByteMatcher::image_gif87a()),
                Box::new(ByteMatcher::image_gif89a()),
                Box::new(ByteMatcher::image_webp()),
                Box::new(ByteMatcher::image_bmp()),
                Box::new(ByteMatcher::image_x_icon()),
                Box::new(ByteMatcher::image_x_icon_cursor()),
            ],
        }
    }

    fn audio_video_classifier() -> GroupedClassifier {
        GroupedClassifier {
            byte_matchers: vec![
                Box::new(ByteMatcher::audio_wave()),
                Box::new(ByteMatcher::audio_aiff()),
                Box::new(ByteMatcher::audio_mpeg_id3()),
                Box::new(ByteMatcher::application_ogg()),
                Box::new(ByteMatcher::audio_midi()),
                Box::new(ByteMatcher::video_avi()),
                Box::new(WebMMatcher),
                Box::new(Mp4Matcher),
                Box::new(Mp3Matcher),
            ],
        }
    }

    fn scriptable_classifier() -> GroupedClassifier {
        GroupedClassifier {
            byte_matchers: vec![
                Box::new(ByteMatcher::text_html_doctype()),
                Box::new(ByteMatcher::text_html_page()),
                Box::new(ByteMatcher::text_html_head()),
                Box::new(ByteMatcher::text_html_script()),
                Box::new(ByteMatcher::text_html_iframe()),
                Box::new(ByteMatcher::text_html_h1()),
                Box::new(ByteMatcher::text_html_div()),
                Box::new(ByteMatcher::text_html_font()),
                Box::new(ByteMatcher::text_html_table()),
                Box::new(ByteMatcher::text_html_a()),
                Box::new(ByteMatcher::text_html_style()),
                Box::new(ByteMatcher::text_html_title()),
                Box::new(ByteMatcher::text_html_b()),
                Box::new(ByteMatcher::text_html_body()),
                Box::new(ByteMatcher::text_html_br()),
                Box::new(ByteMatcher::text_html_p()),
                Box::new(ByteMatcher::text_html_comment()),
                Box::new(ByteMatcher::text_xml()),
                Box::new(ByteMatcher::application_pdf()),
            ],
        }
    }

    fn plaintext_classifier() -> GroupedClassifier {
        GroupedClassifier {
            byte_matchers: vec![
                Box::new(ByteMatcher::text_plain_utf_8_bom()),
                Box::new(ByteMatcher::text_plain_utf_16le_bom()),
                Box::new(ByteMatcher::text_plain_utf_16be_bom()),
                Box::new(ByteMatcher::application_postscript()),
            ],
        }
    }

    fn archive_classifier() -> GroupedClassifier {
        GroupedClassifier {
            byte_matchers: vec![
                Box::new(ByteMatcher::application_zip()),
                Box::new(ByteMatcher::application_x_gzip()),
                Box::new(ByteMatcher::application_x_rar_compressed()),
            ],
        }
    }

    fn font_classifier() -> GroupedClassifier {
        GroupedClassifier {
            byte_matchers: vec![
                Box::new(ByteMatcher::application_font_woff()),
                Box::new(ByteMatcher::true_type_collection()),
                Box::new(ByteMatcher::open_type()),
                Box::new(ByteMatcher::true_type()),
                Box::new(ByteMatcher::application_vnd_ms_font_object()),
            ],
        }
    }
}

impl MIMEChecker for GroupedClassifier {
    fn classify(&self, data: &[u8]) -> Option<MimeType> {
        self.byte_matchers
            .iter()
            .filter_map(|matcher| matcher.classify(data))
            .next()
    }

    fn validate(&self) -> Result<(), String> {
        for byte_matcher in &self.byte_matchers {
            byte_matcher.validate()?
        }
        Ok(())
    }
}

// Contains hard coded byte matchers
impl ByteMatcher {
    // An error-checking byte followed by the string "PNG" followed by CR LF
    // SUB LF, the PNG signature.
    fn image_png() -> ByteMatcher {
        ByteMatcher {
            pattern: b"\x89PNG\r\n\x1A\n",
            mask: b"\xFF\xFF\xFF\xFF\xFF\xFF\xFF\xFF",
            content_type: "image/png".parse().unwrap(),
            leading_ignore: &[],
        }
    }
    // The JPEG Start of Image marker followed by the indicator byte of
    // another marker.
    fn image_jpeg() -> ByteMatcher {
        ByteMatcher {
            pattern: b"\xFF\xD8\xFF",
            mask: b"\xFF\xFF\xFF",
            content_type: "image/jpeg".parse().unwrap(),
            leading_ignore: &[],
        }
    }
    // The string "GIF87a", a GIF signature.
    fn image_gif87a() -> ByteMatcher {
        ByteMatcher {
            pattern: b"GIF87a",
            mask: b"\xFF\xFF\xFF\xFF\xFF\xFF",
            content_type: "image/gif".parse().unwrap(),
            leading_ignore: &[],
        }
    }
    // The string "GIF89a", a GIF signature.
    fn image_gif89a() -> ByteMatcher {
        ByteMatcher {
            pattern: b"GIF89a",
            mask: b"\xFF\xFF\xFF\xFF\xFF\xFF",
            content_type: "image/gif".parse().unwrap(),
            leading_ignore: &[],
        }
    }
    // The string "RIFF" followed by four bytes followed by the string
    // "WEBPVP".
    fn image_webp() -> ByteMatcher {
        ByteMatcher {
            pattern: b"RIFF\x00\x00\x00\x00WEBPVP",
            mask: b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF\xFF\xFF",
            content_type: "image/webp".parse().unwrap(),
            leading_ignore: &[],
        }
    }
    // The string "BM", a BMP signature.
    fn image_bmp() -> ByteMatcher {
        ByteMatcher {
            pattern: b"BM",
            mask: b"\xFF\xFF",
            content_type: "image/bmp".parse().unwrap(),
            leading_ignore: &[],
        }
    }
    // A Windows Icon signature.
    fn image_x_icon() -> ByteMatcher {
        ByteMatcher {
            pattern: b"\x00\x00\x01\x00",
            mask: b"\xFF\xFF\xFF\xFF",
            content_type: "image/x-icon".parse().unwrap(),
            leading_ignore: &[],
        }
    }
    // A Windows Cursor signature.
    fn image_x_icon_cursor() -> ByteMatcher {
        ByteMatcher {
            pattern: b"\x00\x00\x02\x00",
            mask: b"\xFF\xFF\xFF\xFF",
            content_type: "image/x-icon".parse().unwrap(),
            leading_ignore: &[],
        }
    }
    // The string "RIFF" followed by four bytes followed by the string
    // "WAVE", the WAVE signature.
    fn audio_wave() -> ByteMatcher {
        ByteMatcher {
            pattern: b"RIFF\x00\x00\x00\x00WAVE",
            mask: b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF",
            content_type: "audio/wave".parse().unwrap(),
            leading_ignore: &[],
        }
    }
    // The string "FORM" followed by four bytes followed by the string
    // "AIFF", the AIFF signature.
    fn audio_aiff() -> ByteMatcher {
        ByteMatcher {
            pattern: b"FORM\x00\x00\x00\x00AIFF",
            mask: b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF",
            content_type: "audio/aiff".parse().unwrap(),
            leading_ignore: &[],
        }
    }
    // The string "ID3", the ID3v2-tagged MP3 signature.
    fn audio_mpeg_id3() -> ByteMatcher {
        ByteMatcher {
            pattern: b"ID3",
            mask: b"\xFF\xFF\xFF",
            content_type: "audio/mpeg".parse().unwrap(),
            leading_ignore: &[],
        }
    }
    // The string "OggS" followed by NUL, the Ogg container signature.
    fn application_ogg() -> ByteMatcher {
        ByteMatcher {
            pattern: b"OggS\x00",
            mask: b"\xFF\xFF\xFF\xFF\xFF",
            content_type: "application/ogg".parse().unwrap(),
            leading_ignore: &[],
        }
    }
    // The string "MThd" followed by four bytes representing the number 6 in
    // 32 bits (big-endian), the MIDI signature.
    fn audio_midi() -> ByteMatcher {
        ByteMatcher {
            pattern: b"MThd\x00\x00\x00\x06",
            mask: b"\xFF\xFF\xFF\xFF\xFF\xFF\xFF\xFF",
            content_type: "audio/midi".parse().unwrap(),
            leading_ignore: &[],
        }
    }
    // The string "RIFF" followed by four bytes followed by the string
    // "AVI ", the AVI signature.
    fn video_avi() -> ByteMatcher {
        ByteMatcher {
            pattern: b"RIFF\x00\x00\x00\x00AVI ",
            mask: b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF",
            content_type: "video/avi".parse().unwrap(),
            leading_ignore: &[],
        }
    }
    // doctype terminated with Tag terminating (TT) Byte
    fn text_html_doctype() -> TagTerminatedByteMatcher {
        TagTerminatedByteMatcher {
            matcher: ByteMatcher {
                pattern: b"<!DOCTYPE HTML",
                mask: b"\xFF\xFF\xDF\xDF\xDF\xDF\xDF\xDF\xDF\xFF\xDF\xDF\xDF\xDF",
                content_type: "text/html".parse().unwrap(),
                leading_ignore: b"\t\n\x0C\r ",
            },
        }
    }
    // HTML terminated with Tag terminating (TT) Byte: 0x20 (SP)
    fn text_html_page() -> TagTerminatedByteMatcher {
        TagTerminatedByteMatcher {
            matcher: ByteMatcher {
                pattern: b"<HTML",
                mask: b"\xFF\xDF\xDF\xDF\xDF",
                content_type: "text/html".parse().unwrap(),
                leading_ignore: b"\t\n\x0C\r ",
            },
        }
    }
    // head terminated with Tag Terminating (TT) Byte
    fn text_html_head() -> TagTerminatedByteMatcher {
        TagTerminatedByteMatcher {
            matcher: ByteMatcher {
                pattern: b"<HEAD",
                mask: b"\xFF\xDF\xDF\xDF\xDF",
                content_type: "text/html".parse().unwrap(),
                leading_ignore: b"\t\n\x0C\r ",
            },
        }
    }
    // script terminated with Tag Terminating (TT) Byte
    fn text_html_script() -> TagTerminatedByteMatcher {
        TagTerminatedByteMatcher {
            matcher: ByteMatcher {
                pattern: b"<SCRIPT",
                mask: b"\xFF\xDF\xDF\xDF\xDF\xDF\xDF",
                content_type: "text/html".parse().unwrap(),
                leading_ignore: b"\t\n\x0C\r ",
            },
        }
    }
    // iframe terminated with Tag Terminating (TT) Byte
    fn text_html_iframe() -> TagTerminatedByteMatcher {
        TagTerminatedByteMatcher {
            matcher: ByteMatcher {
                pattern: b"<IFRAME",
                mask: b"\xFF\xDF\xDF\xDF\xDF\xDF\xDF",
                content_type: "text/html".parse().unwrap(),
                leading_ignore: b"\t\n\x0C\r ",
            },
        }
    }
    // h1 terminated with Tag Terminating (TT) Byte
    fn text_html_h1() -> TagTerminatedByteMatcher {
        TagTerminatedByteMatcher {
            matcher: ByteMatcher {
                pattern: b"<H1",
                mask: b"\xFF\xDF\xFF",
                content_type: "text/html".parse().unwrap(),
                leading_ignore: b"\t\n\x0C\r ",
            },
        }
    }
    // div terminated with Tag Terminating (TT) Byte
    fn text_html_div() -> TagTerminatedByteMatcher {
        TagTerminatedByteMatcher {
            matcher: ByteMatcher {
                pattern: b"<DIV",
                mask: b"\xFF\xDF\xDF\xDF",
                content_type: "text/html".parse().unwrap(),
                leading_ignore: b"\t\n\x0C\r ",
            },
        }
    }
    // font terminated with Tag Terminating (TT) Byte
    fn text_html_font() -> TagTerminatedByteMatcher {
        TagTerminatedByteMatcher {
            matcher: ByteMatcher {
                pattern: b"<FONT",
                mask: b"\xFF\xDF\xDF\xDF\xDF",
                content_type: "text/html".parse().unwrap(),
                leading_ignore: b"\t\n\x0C\r ",
            },
        }
    }
    // table terminated with Tag Terminating (TT) Byte
    fn text_html_table() -> TagTerminatedByteMatcher {
        TagTerminatedByteMatcher {
            matcher: ByteMatcher {
                pattern: b"<TABLE",
                mask: b"\xFF\xDF\xDF\xDF\xDF\xDF",
                content_type: "text/html".parse().unwrap(),
                leading_ignore: b"\t\n\x0C\r ",
            },
        }
    }
    // a terminated with Tag Terminating (TT) Byte
    fn text_html_a() -> TagTerminatedByteMatcher {
        TagTerminatedByteMatcher {
            matcher: ByteMatcher {
                pattern: b"<A",
                mask: b"\xFF\xDF",
                content_type: "text/html".parse().unwrap(),
                leading_ignore: b"\t\n\x0C\r ",
            },
        }
    }
    // style terminated with Tag Terminating (TT) Byte
    fn text_html_style() -> TagTerminatedByteMatcher {
        TagTerminatedByteMatcher {
            matcher: ByteMatcher {
                pattern: b"<STYLE",
                mask: b"\xFF\xDF\xDF\xDF\xDF\xDF",
                content_type: "text/html".parse().unwrap(),
                leading_ignore: b"\t\n\x0C\r ",
            },
        }
    }
    // title terminated with Tag Terminating (TT) Byte
    fn text_html_title() -> TagTerminatedByteMatcher {
        TagTerminatedByteMatcher {
            matcher: ByteMatcher {
                pattern: b"<TITLE",
                mask: b"\xFF\xDF\xDF\xDF\xDF\xDF",
                content_type: "text/html".parse().unwrap(),
                leading_ignore: b"\t\n\x0C\r ",
            },
        }
    }
    // b terminated with Tag Terminating (TT) Byte
    fn text_html_b() -> TagTerminatedByteMatcher {
        TagTerminatedByteMatcher {
            matcher: ByteMatcher {
                pattern: b"<B",
                mask: b"\xFF\xDF",
                content_type: "text/html".parse().unwrap(),
                leading_ignore: b"\t\n\x0C\r ",
            },
        }
    }
    // body terminated with Tag Terminating (TT) Byte
    fn text_html_body() -> TagTerminatedByteMatcher {
        TagTerminatedByteMatcher {
            matcher: ByteMatcher {
                pattern: b"<BODY",
                mask: b"\xFF\xDF\xDF\xDF\xDF",
                content_type: "text/html".parse().unwrap(),
                leading_ignore: b"\t\n\x0C\r ",
            },
        }
    }
    // br terminated with Tag Terminating (TT) Byte
    fn text_html_br() -> TagTerminatedByteMatcher {
        TagTerminatedByteMatcher {
            matcher: ByteMatcher {
                pattern: b"<BR",
                mask: b"\xFF\xDF\xDF",
                content_type: "text/html".parse().unwrap(),
                leading_ignore: b"\t\n\x0C\r ",
            },
        }
    }
    // p terminated with Tag Terminating (TT) Byte
    fn text_html_p() -> TagTerminatedByteMatcher {
        TagTerminatedByteMatcher {
            matcher: ByteMatcher {
                pattern: b"<P",
                mask: b"\xFF\xDF",
                content_type: "text/html".parse().unwrap(),
                leading_ignore: b"\t\n\x0C\r ",
            },
        }
    }
    // comment terminated with Tag Terminating (TT) Byte
    fn text_html_comment() -> TagTerminatedByteMatcher {
        TagTerminatedByteMatcher {
            matcher: ByteMatcher {
                pattern: b"<!--",
                mask: b"\xFF\xFF\xFF\xFF",
                content_type: "text/html".parse().unwrap(),
                leading_ignore: b"\t\n\x0C\r ",
            },
        }
    }
    // The string "<?xml".
    fn text_xml() -> ByteMatcher {
        ByteMatcher {
            pattern: b"<?xml",
            mask: b"\xFF\xFF\xFF\xFF\xFF",
            content_type: "text/xml".parse().unwrap(),
            leading_ignore: b"\t\n\x0C\r ",
        }
    }
    // The string "%PDF-", the PDF signature.
    fn application_pdf() -> ByteMatcher {
        ByteMatcher {
            pattern: b"%PDF-",
            mask: b"\xFF\xFF\xFF\xFF\xFF",
            content_type: "application/pdf".parse().unwrap(),
            leading_ignore: &[],
        }
    }
    // UTF-8 BOM
    fn text_plain_utf_8_bom() -> ByteMatcher {
        ByteMatcher {
            pattern: b"\xEF\xBB\xBF\x00",
            mask: b"\xFF\xFF\xFF\x00",
            content_type: "text/plain".parse().unwrap(),
            leading_ignore: &[],
        }
    }
    // UTF-16LE BOM
    fn text_plain_utf_16le_bom() -> ByteMatcher {
        ByteMatcher {
            pattern: b"\xFF\xFE\x00\x00",
            mask: b"\xFF\xFF\x00\x00",
            content_type: "text/plain".parse().unwrap(),
            leading_ignore: &[],
        }
    }
    // UTF-16BE BOM
    fn text_plain_utf_16be_bom() -> ByteMatcher {
        ByteMatcher {
            pattern: b"\xFE\xFF\x00\x00",
            mask: b"\xFF\xFF\x00\x00",
            content_type: "text/plain".parse().unwrap(),
            leading_ignore: &[],
        }
    }
    // The string "%!PS-Adobe-", the PostScript signature.
    fn application_postscript() -> ByteMatcher {
        ByteMatcher {
            pattern: b"%!PS-Adobe-",
            mask: b"\xFF\xFF\xFF\xFF\xFF\xFF\xFF\xFF\xFF\xFF\xFF",
            content_type: "application/postscript".parse().unwrap(),
            leading_ignore: &[],
        }
    }
    // The string "PK" followed by ETX EOT, the ZIP archive signature.
    fn application_zip() -> ByteMatcher {
        ByteMatcher {
            pattern: b"PK\x03\x04",
            mask: b"\xFF\xFF\xFF\xFF",
            content_type: "application/zip".parse().unwrap(),
            leading_ignore: &[],
        }
    }
    // The GZIP archive signature.
    fn application_x_gzip() -> ByteMatcher {
        ByteMatcher {
            pattern: b"\x1F\x8B\x08",
            mask: b"\xFF\xFF\xFF",
            content_type: "application/x-gzip".parse().unwrap(),
            leading_ignore: &[],
        }
    }
    // The string "Rar!" followed by SUB BEL NUL, the RAR archive signature.
    fn application_x_rar_compressed() -> ByteMatcher {
        ByteMatcher {
            pattern: b"Rar!\x1A\x07\x00",
            mask: b"\xFF\xFF\xFF\xFF\xFF\xFF\xFF",
            content_type: "application/x-rar-compressed".parse().unwrap(),
            leading_ignore: &[],
        }
    }
    // The string "wOFF", the Web Open Font Format signature.
    fn application_font_woff() -> ByteMatcher {
        ByteMatcher {
            pattern: b"wOFF",
            mask: b"\xFF\xFF\xFF\xFF",
            content_type: "application/font-woff".parse().unwrap(),
            leading_ignore: &[],
        }
    }
    // The string "ttcf", the TrueType Collection signature.
    fn true_type_collection() -> ByteMatcher {
        ByteMatcher {
            pattern: b"ttcf",
            mask: b"\xFF\xFF\xFF\xFF",
            content_type: "application/font-sfnt".parse().unwrap(),
            leading_ignore: &[],
        }
    }
    // The string "OTTO", the OpenType signature.
    fn open_type() -> ByteMatcher {
        ByteMatcher {
            pattern: b"OTTO",
            mask: b"\xFF\xFF\xFF\xFF",
            content_type: "application/font-sfnt".parse().unwrap(),
            leading_ignore: &[],
        }
    }
    // 4 bytes representing the version number 1.0, a TrueType signature.
    fn true_type() -> ByteMatcher {
        ByteMatcher {
            pattern: b"\x00\x01\x00\x00",
            mask: b"\xFF\xFF\xFF\xFF",
            content_type: "application/font-sfnt".parse().unwrap(),
            leading_ignore: &[],
        }
    }
    // 34 bytes followed by the string "LP", the Embedded OpenType signature.
    fn application_vnd_ms_font_object() -> ByteMatcher {
        ByteMatcher {
            pattern: b"\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\
                       \x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\
                       \x00\x00LP",
            mask: b"\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\
                    \x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\
                    \x00\x00\xFF\xFF",
            content_type: "application/vnd.ms-fontobject".parse().unwrap(),
            leading_ignore: &[],
        }
    }
}
