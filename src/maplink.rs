//! Google Maps directions link for a finished route.
//!
//! The downstream UI opens this URL directly, so the shape is fixed:
//! `https://www.google.com/maps/dir/<addr1>/<addr2>/.../<addrN>` with each
//! address percent-encoded, in final sequence order.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::model::RouteStop;

/// Characters kept literal, matching JS `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Build the directions link from stops in final sequence order.
pub fn maps_directions_link(stops: &[RouteStop]) -> String {
    let path = stops
        .iter()
        .map(|stop| utf8_percent_encode(&stop.address, URI_COMPONENT).to_string())
        .collect::<Vec<_>>()
        .join("/");

    format!("https://www.google.com/maps/dir/{}", path)
}
