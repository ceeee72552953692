/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

//! Canonical structured field keys and value-format helpers.

use crate::endpoint::Endpoint;
use crate::message::InboundMessage;

pub const EVENT: &str = "event";
pub const COMPONENT: &str = "component";

pub const TOPIC: &str = "topic";
pub const ORIGIN: &str = "origin";
pub const TARGET: &str = "target";
pub const SENDER: &str = "sender";
pub const BODY_LEN: &str = "body_len";
pub const ATTACHMENTS: &str = "attachments";
pub const RETRY_AFTER_MS: &str = "retry_after_ms";

pub const ERR: &str = "err";
pub const REASON: &str = "reason";

pub const NONE: &str = "none";
pub const REASON_TARGET_NOT_FOUND: &str = "target_not_found";

pub fn format_endpoint(endpoint: Endpoint) -> String {
    endpoint.to_string()
}

pub fn format_optional_url(url: Option<&str>) -> String {
    url.unwrap_or(NONE).to_string()
}

/// Compact inbound-message summary for ingress logging.
pub fn format_message_summary(message: &InboundMessage) -> String {
    format!(
        "sender={} origin={} body_len={} attachments={}",
        message.sender,
        message.origin,
        message.body.len(),
        message.attachments.len()
    )
}
