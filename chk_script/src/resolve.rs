//! Name resolution for argument text. Every function here takes one normalized argument (quoted
//! or bare) and looks only at names. The argument parsers try a bare number before calling in
//! here, so a name made of digits is only reachable in quotes.

use std::borrow::Cow;

use chk_data::{NO_STRING, script_id};

use crate::literals::{parse_long, parse_short};
use crate::normalize::unescape_quoted;
use crate::strings::{Interned, StringInterner, StringSlot};
use crate::tables::{CompilerContext, name_key};
use crate::units::{canonical_unit, legacy_unit};

/// Longest unit name accepted, in bytes.
const MAX_UNIT_NAME: usize = 39;

/// Inner text of a `"..."` argument.
pub(crate) fn unquote(text: &[u8]) -> Option<&[u8]> {
    match text {
        [b'"', inner @ .., b'"'] => Some(inner),
        _ => None,
    }
}

pub(crate) fn is_quoted(text: &[u8]) -> bool {
    unquote(text).is_some()
}

/// The name an argument spells: the decoded inner text when quoted, otherwise the text itself.
fn name_text(text: &[u8]) -> Cow<'_, [u8]> {
    match unquote(text) {
        Some(inner) => Cow::Owned(unescape_quoted(inner)),
        None => Cow::Borrowed(text),
    }
}

/// Whether `text` is a reserved "no value" name such as `No String`. Bare text compares after
/// normalization; quoted text compares ignoring case only.
fn is_sentinel(text: &[u8], sentinel: &str) -> bool {
    match unquote(text) {
        Some(inner) => inner.eq_ignore_ascii_case(sentinel.as_bytes()),
        None => name_key(text) == name_key(sentinel.as_bytes()),
    }
}

/// Decimal number after `prefix`, if that is all `key` holds.
fn numbered(key: &[u8], prefix: &[u8]) -> Option<u32> {
    let digits = key.strip_prefix(prefix)?;
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(digits).ok()?.parse().ok()
}

fn player_keyword(key: &[u8]) -> Option<u32> {
    let player = numbered(key, b"PLAYER").or_else(|| numbered(key, b"P"));
    if let Some(number) = player.filter(|n| (1..=12).contains(n)) {
        return Some(number - 1);
    }
    let force = numbered(key, b"FORCE").or_else(|| numbered(key, b"F"));
    if let Some(number) = force.filter(|n| (1..=4).contains(n)) {
        return Some(number + 17);
    }
    if let Some(id) = key.strip_prefix(b"ID:") {
        return parse_long(id);
    }
    match key {
        b"NONE" | b"UNKNOWN/UNUSED" => Some(12),
        b"CURRENTPLAYER" | b"CP" => Some(13),
        b"FOES" => Some(14),
        b"ALLIES" => Some(15),
        b"NEUTRALPLAYERS" => Some(16),
        b"ALLPLAYERS" | b"AP" => Some(17),
        b"UNUSED1" => Some(22),
        b"UNUSED2" => Some(23),
        b"UNUSED3" => Some(24),
        b"UNUSED4" => Some(25),
        b"NONALLIEDVICTORYPLAYERS" | b"NONAVPLAYERS" => Some(26),
        _ => None,
    }
}

/// Player or group id: built-in player names first, then force names.
pub(crate) fn resolve_player(ctx: &CompilerContext, text: &[u8]) -> Option<u32> {
    let name = name_text(text);
    if name.is_empty() {
        return None;
    }
    player_keyword(&name_key(&name)).or_else(|| ctx.groups.get(&name))
}

pub(crate) fn resolve_location(ctx: &CompilerContext, text: &[u8]) -> Option<u32> {
    let name = name_text(text);
    if name.is_empty() {
        return None;
    }
    ctx.locations.get(&name)
}

/// Unit type: `ID:n`, then default names, then the scenario's names, then legacy names.
pub(crate) fn resolve_unit(ctx: &CompilerContext, text: &[u8]) -> Option<u16> {
    let name = name_text(text);
    if name.is_empty() || name.len() > MAX_UNIT_NAME {
        return None;
    }
    if let Some(id) = name_key(&name).strip_prefix(b"ID:") {
        return parse_short(id);
    }
    canonical_unit(&name)
        .or_else(|| ctx.units.get(&name).and_then(|id| u16::try_from(id).ok()))
        .or_else(|| legacy_unit(&name))
}

/// Switch index: `SwitchN` (1-based in text), then switch names.
pub(crate) fn resolve_switch(ctx: &CompilerContext, text: &[u8]) -> Option<u32> {
    let name = name_text(text);
    if name.is_empty() {
        return None;
    }
    if let Some(number) = numbered(&name_key(&name), b"SWITCH").filter(|n| (1..=256).contains(n)) {
        return Some(number - 1);
    }
    ctx.switches.get(&name)
}

/// AI script id by name, or a four-character code. A bare all-digit code is not read as a code,
/// since the caller parses it as a number first.
pub(crate) fn resolve_script(ctx: &CompilerContext, text: &[u8]) -> Option<u32> {
    if is_sentinel(text, "No Script") {
        return Some(0);
    }
    let name = name_text(text);
    if name.is_empty() {
        return None;
    }
    if let Some(id) = ctx.scripts.get(&name) {
        return Some(id);
    }
    let code = <[u8; 4]>::try_from(name.as_ref()).ok()?;
    (is_quoted(text) || !code.iter().all(u8::is_ascii_digit)).then(|| script_id(&code))
}

/// String argument: `No String`, a quoted literal to intern, or a raw string id.
pub(crate) fn resolve_string(strings: &mut StringInterner, text: &[u8], slot: StringSlot) -> Option<Interned> {
    resolve_text(strings, text, slot, "No String")
}

/// Sound argument: like a string argument, with `No WAV` as the empty value.
pub(crate) fn resolve_sound(strings: &mut StringInterner, text: &[u8], slot: StringSlot) -> Option<Interned> {
    resolve_text(strings, text, slot, "No WAV")
}

fn resolve_text(strings: &mut StringInterner, text: &[u8], slot: StringSlot, empty: &str) -> Option<Interned> {
    if is_sentinel(text, empty) {
        return Some(Interned::Existing(NO_STRING));
    }
    match unquote(text) {
        Some(inner) => Some(strings.intern(&unescape_quoted(inner), slot)),
        None => parse_long(text).map(Interned::Existing),
    }
}
