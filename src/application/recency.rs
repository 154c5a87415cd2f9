//! Request recency tokens.
//!
//! Every request takes a fresh token from a [`RequestSeq`]. Requests whose
//! responses supersede each other share a [`Channel`]; only the channel's
//! latest token may apply its response.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct RequestSeq {
    next: u64,
}

impl RequestSeq {
    pub fn next_token(&mut self) -> RequestToken {
        let token = RequestToken(self.next);
        self.next = self.next.wrapping_add(1);
        token
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Channel {
    latest: Option<RequestToken>,
}

impl Channel {
    /// Issue a token that supersedes whatever is in flight on this channel.
    pub fn issue(&mut self, seq: &mut RequestSeq) -> RequestToken {
        let token = seq.next_token();
        self.latest = Some(token);
        token
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.latest == Some(token)
    }

    /// Settle `token`. Returns `false` when a newer request superseded it.
    pub fn finish_if_current(&mut self, token: RequestToken) -> bool {
        let current = self.is_current(token);
        if current {
            self.latest = None;
        }
        current
    }
}
