// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Stored-injection defence for user-supplied message text.
//!
//! Applied to subjects and bodies before they are stored:
//! - `<script>` and `<style>` elements are removed together with their bodies
//! - every other tag is removed, its text content is kept
//! - `javascript:` URLs and inline `on<event>=` handlers are removed
//!
//! Text outside markup is preserved verbatim apart from surrounding
//! whitespace being trimmed.

use regex::Regex;
use std::sync::LazyLock;

static SCRIPT_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"(?is)<(script|style)\b[^>]*>.*?</(script|style)\s*>").expect("valid regex")
});

static TAG: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?s)</?[A-Za-z!][^>]*>").expect("valid regex"));

static JAVASCRIPT_URL: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?i)javascript\s*:").expect("valid regex"));

/// Inline handlers for DOM events. Limited to real event names so prose such
/// as `one=2` is left alone.
static EVENT_HANDLER: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(concat!(
		r"(?i)\bon(?:",
		r"abort|afterprint|animation(?:end|iteration|start)|auxclick|beforeinput|beforeprint|",
		r"beforeunload|blur|cancel|canplay|canplaythrough|change|click|close|contextmenu|copy|",
		r"cut|dblclick|drag|dragend|dragenter|dragleave|dragover|dragstart|drop|",
		r"durationchange|ended|error|focus|focusin|focusout|formdata|hashchange|input|invalid|",
		r"keydown|keypress|keyup|load|loadeddata|loadedmetadata|loadstart|message|",
		r"mousedown|mouseenter|mouseleave|mousemove|mouseout|mouseover|mouseup|",
		r"pagehide|pageshow|paste|pause|play|playing|pointer(?:cancel|down|enter|leave|move|out|over|up)|",
		r"popstate|progress|ratechange|reset|resize|scroll|search|seeked|seeking|select|",
		r"show|stalled|storage|submit|suspend|timeupdate|toggle|",
		r"touch(?:cancel|end|move|start)|transition(?:end|run|start)|unload|volumechange|",
		r"waiting|wheel",
		r")\s*=",
	))
	.expect("valid regex")
});

/// Remove markup and script vectors from `input`.
///
/// Passes repeat until nothing changes so that removals cannot splice a new
/// tag together (`<scr<b></b>ipt>`). Every changing pass shortens the text,
/// so the loop terminates.
pub fn sanitize_text(input: &str) -> String {
	let mut current = input.trim().to_string();
	loop {
		let next = sanitize_pass(&current);
		if next == current {
			return next;
		}
		current = next;
	}
}

fn sanitize_pass(input: &str) -> String {
	let without_scripts = SCRIPT_BLOCK.replace_all(input, "");
	let without_tags = TAG.replace_all(&without_scripts, "");
	let without_js = JAVASCRIPT_URL.replace_all(&without_tags, "");
	let without_handlers = EVENT_HANDLER.replace_all(&without_js, "");
	without_handlers.trim().to_string()
}

/// Returns true if `text` still contains something that looks like a tag.
pub fn contains_markup(text: &str) -> bool {
	TAG.is_match(text) || SCRIPT_BLOCK.is_match(text)
}
