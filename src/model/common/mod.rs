//! Types that mean the same thing on the wire and inside the client.

pub mod election;
