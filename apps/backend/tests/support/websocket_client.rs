// WebSocket client utilities for testing

use std::collections::VecDeque;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// WebSocket test client speaking the JSON protocol.
pub struct WebSocketClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    next_request: u64,
    /// Pushes that arrived while waiting for an ack.
    backlog: VecDeque<Value>,
}

impl WebSocketClient {
    /// Connect, retrying until the server accepts or `timeout` passes.
    pub async fn connect_retry(url: &str, timeout: Duration) -> TestResult<Self> {
        let start = tokio::time::Instant::now();
        loop {
            match connect_async(url).await {
                Ok((stream, _)) => {
                    return Ok(Self {
                        stream,
                        next_request: 1,
                        backlog: VecDeque::new(),
                    })
                }
                Err(err) => {
                    if start.elapsed() >= timeout {
                        return Err(Box::new(err));
                    }
                    tokio::time::sleep(Duration::from_millis(5)).await;
                }
            }
        }
    }

    /// Connect and consume the `welcome`; returns the client and its
    /// participant id.
    pub async fn connect_welcomed(url: &str) -> TestResult<(Self, String)> {
        let mut client = Self::connect_retry(url, Duration::from_secs(1)).await?;
        let welcome = client.recv_type(Duration::from_secs(2), "welcome").await?;
        let id = welcome["participant_id"]
            .as_str()
            .ok_or("welcome without participant_id")?
            .to_string();
        Ok((client, id))
    }

    pub async fn send_text(&mut self, text: &str) -> TestResult {
        self.stream.send(Message::Text(text.to_string().into())).await?;
        Ok(())
    }

    pub async fn send_binary(&mut self, bytes: Vec<u8>) -> TestResult {
        self.stream.send(Message::Binary(bytes.into())).await?;
        Ok(())
    }

    /// Send `msg` with a fresh `request_id` and wait for its ack. Pushes
    /// received in the meantime stay queued for the next `recv_*`.
    pub async fn request(&mut self, mut msg: Value, timeout: Duration) -> TestResult<Value> {
        let request_id = Value::from(self.next_request);
        self.next_request += 1;
        msg["request_id"] = request_id.clone();
        self.send_text(&msg.to_string()).await?;

        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            if remaining.is_zero() {
                return Err("Timeout waiting for ack".into());
            }
            let reply = self.recv_frame(remaining).await?;
            if reply["type"] == "ack" && reply["request_id"] == request_id {
                return Ok(reply);
            }
            self.backlog.push_back(reply);
        }
    }

    /// Next message as JSON, queued pushes first.
    pub async fn recv_json(&mut self, timeout: Duration) -> TestResult<Value> {
        match self.backlog.pop_front() {
            Some(queued) => Ok(queued),
            None => self.recv_frame(timeout).await,
        }
    }

    async fn recv_frame(&mut self, timeout: Duration) -> TestResult<Value> {
        loop {
            let next = tokio::time::timeout(timeout, self.stream.next())
                .await
                .map_err(|_| "Timeout waiting for message")?;
            match next {
                Some(Ok(Message::Text(text))) => return Ok(serde_json::from_str(&text)?),
                Some(Ok(Message::Close(_))) | None => return Err("connection closed".into()),
                Some(Ok(_)) => continue,
                Some(Err(err)) => return Err(Box::new(err)),
            }
        }
    }

    /// Skip messages until one of type `ty` arrives.
    pub async fn recv_type(&mut self, timeout: Duration, ty: &str) -> TestResult<Value> {
        self.recv_matching(timeout, |msg| msg["type"] == ty).await
    }

    /// Skip messages until `pred` holds.
    pub async fn recv_matching(
        &mut self,
        timeout: Duration,
        pred: impl Fn(&Value) -> bool,
    ) -> TestResult<Value> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            if remaining.is_zero() {
                return Err("Timeout waiting for matching message".into());
            }
            let msg = self.recv_json(remaining).await?;
            if pred(&msg) {
                return Ok(msg);
            }
        }
    }

    /// Skip until a `room_state` whose snapshot satisfies `pred`.
    pub async fn recv_state(
        &mut self,
        timeout: Duration,
        pred: impl Fn(&Value) -> bool,
    ) -> TestResult<Value> {
        let msg = self
            .recv_matching(timeout, |msg| {
                msg["type"] == "room_state" && pred(&msg["snapshot"])
            })
            .await?;
        Ok(msg["snapshot"].clone())
    }

    /// True once the server has closed the socket.
    pub async fn closed_within(&mut self, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            match tokio::time::timeout(remaining, self.stream.next()).await {
                Err(_) => return false,
                Ok(None) | Ok(Some(Ok(Message::Close(_)))) | Ok(Some(Err(_))) => return true,
                Ok(Some(Ok(_))) => continue,
            }
        }
    }

    pub async fn close(&mut self) -> TestResult {
        self.stream.close(None).await?;
        Ok(())
    }
}
