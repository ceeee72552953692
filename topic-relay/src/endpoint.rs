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

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

///
/// [`Endpoint`] identifies one relay destination as a `(community, room)` pair.
/// Endpoints are the atomic addressable unit of fan-out; an endpoint exists only
/// as a member of topic sets and carries no record of its own.
///
/// The textual form is `"<community>:<room>"`, which is also the serialized
/// representation inside the persisted link-state document.
///
/// # Examples
///
/// ```
/// use topic_relay::Endpoint;
///
/// let endpoint: Endpoint = "190805181874746880:500540849768823813".parse().unwrap();
/// assert_eq!(endpoint, Endpoint::new(190805181874746880, 500540849768823813));
/// assert_eq!(endpoint.to_string(), "190805181874746880:500540849768823813");
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Endpoint {
    pub community_id: u64,
    pub room_id: u64,
}

impl Endpoint {
    pub fn new(community_id: u64, room_id: u64) -> Self {
        Self {
            community_id,
            room_id,
        }
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.community_id, self.room_id)
    }
}

/// Failure to parse the `"<community>:<room>"` textual endpoint form.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseEndpointError;

impl Display for ParseEndpointError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "endpoint must be formatted as '<community>:<room>'")
    }
}

impl Error for ParseEndpointError {}

impl FromStr for Endpoint {
    type Err = ParseEndpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (community, room) = s.split_once(':').ok_or(ParseEndpointError)?;
        let community_id = community.parse().map_err(|_| ParseEndpointError)?;
        let room_id = room.parse().map_err(|_| ParseEndpointError)?;
        Ok(Self {
            community_id,
            room_id,
        })
    }
}

impl Serialize for Endpoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Endpoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
