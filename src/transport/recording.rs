use std::sync::{Arc, Mutex};

use crate::protocol::Message;
use crate::transport::LineChannel;

/// One line seen by a [`RecordingTransport`], from its owner's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    Sent(String),
    Received(String),
}

/// Shared view of a recorded trace; stays readable after the transport moves.
#[derive(Debug, Clone, Default)]
pub struct TraceHandle(Arc<Mutex<Vec<TraceEvent>>>);

impl TraceHandle {
    pub fn events(&self) -> anyhow::Result<Vec<TraceEvent>> {
        let trace = self
            .0
            .lock()
            .map_err(|_| anyhow::anyhow!("trace lock poisoned"))?;
        Ok(trace.clone())
    }

    fn push(&self, event: TraceEvent) -> anyhow::Result<()> {
        self.0
            .lock()
            .map_err(|_| anyhow::anyhow!("trace lock poisoned"))?
            .push(event);
        Ok(())
    }
}

/// Wraps a channel and records every line that passes through it.
pub struct RecordingTransport<C: LineChannel> {
    inner: C,
    trace: TraceHandle,
}

impl<C: LineChannel> RecordingTransport<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            trace: TraceHandle::default(),
        }
    }

    pub fn trace(&self) -> TraceHandle {
        self.trace.clone()
    }
}

#[async_trait::async_trait]
impl<C: LineChannel> LineChannel for RecordingTransport<C> {
    async fn send_line(&mut self, line: &str) -> anyhow::Result<()> {
        self.inner.send_line(line).await?;
        self.trace.push(TraceEvent::Sent(line.to_string()))
    }

    async fn recv_line(&mut self) -> anyhow::Result<String> {
        let line = self.inner.recv_line().await?;
        self.trace.push(TraceEvent::Received(line.clone()))?;
        Ok(line)
    }
}

/// Replay a trace and verify strict alternation: between two coordinates we
/// sent, the peer must have sent us something.
pub fn check_alternation(events: &[TraceEvent]) -> anyhow::Result<()> {
    let mut awaiting_peer = false;
    for (i, event) in events.iter().enumerate() {
        match event {
            TraceEvent::Sent(line) => {
                if matches!(Message::parse(line), Ok(Message::Coordinate(_))) {
                    if awaiting_peer {
                        return Err(anyhow::anyhow!(
                            "event {}: sent coordinate {:?} without a reply to the previous one",
                            i,
                            line
                        ));
                    }
                    awaiting_peer = true;
                }
            }
            TraceEvent::Received(_) => awaiting_peer = false,
        }
    }
    Ok(())
}
