//! Per-frame output: snapshots of what the pool would draw, serialized and
//! handed to a sender.

mod sender;
mod serializer;

use log::debug;
use pinkboard_config::{OutputConfig, SenderType, SerializerType};
use pinkboard_core::{ParticlePool, Vector2};
use serde::Serialize;

// Re-export types
pub use self::sender::{FileSender, LineSender, NullSender, Sender, StdioSender, TransportError};
pub use self::serializer::{
    BinarySerializer, JsonSerializer, SerializationError, SerializeObject, Serializer,
};

/// One drawn sprite.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ParticleSprite {
    pub position: Vector2,
    pub size: f32,
    pub alpha: f32,
}

/// Everything drawn in one frame, oldest particle first.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    pub frame: u64,
    pub elapsed: f64,
    pub particles: Vec<ParticleSprite>,
}

impl FrameSnapshot {
    pub fn capture(frame: u64, elapsed: f64, pool: &ParticlePool, sprite_size: f32) -> Self {
        let particles = pool
            .iter()
            .map(|particle| {
                let (size, alpha) = particle.appearance(pool.max_age(), sprite_size);
                ParticleSprite {
                    position: particle.position,
                    size,
                    alpha,
                }
            })
            .collect();

        Self {
            frame,
            elapsed,
            particles,
        }
    }
}

/// Pairs a serializer with a sender and throttles how often frames go out.
pub struct TransportController {
    serializer: Box<dyn Serializer>,
    sender: Box<dyn Sender>,
    every: u32,
    enabled: bool,
    current_frame: u64,
}

impl TransportController {
    pub fn new(serializer: Box<dyn Serializer>, sender: Box<dyn Sender>, every: u32) -> Self {
        Self {
            serializer,
            sender,
            every: every.max(1),
            enabled: true,
            current_frame: 0,
        }
    }

    pub fn from_config(config: &OutputConfig) -> Result<Self, TransportError> {
        let serializer: Box<dyn Serializer> = match config.serializer {
            SerializerType::Json => Box::new(JsonSerializer),
            SerializerType::Binary => Box::new(BinarySerializer),
        };

        let sender: Box<dyn Sender> = match (config.sender, config.path.as_deref()) {
            (SenderType::Null, _) => Box::new(NullSender),
            (SenderType::Stdio, _) => Box::new(StdioSender::stdout()),
            (SenderType::File, Some(path)) => Box::new(FileSender::append_to(path)?),
            (SenderType::File, None) => {
                return Err(TransportError::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "file sender configured without a path",
                )))
            }
        };

        debug!(
            "Transport: serializer={:?}, sender={:?}, every={}",
            config.serializer, config.sender, config.every
        );
        let mut controller = Self::new(serializer, sender, config.every);
        controller.enabled = config.sender != SenderType::Null;
        Ok(controller)
    }

    /// Whether `frame` would be sent. Lets the caller skip building
    /// snapshots that would be dropped.
    pub fn wants_frame(&self, frame: u64) -> bool {
        self.enabled && frame % u64::from(self.every) == 0
    }

    /// Serializes and sends the snapshot if its frame is due. Returns whether
    /// it was sent.
    pub fn publish(&mut self, snapshot: &FrameSnapshot) -> Result<bool, TransportError> {
        self.current_frame = snapshot.frame;
        if !self.wants_frame(snapshot.frame) {
            return Ok(false);
        }

        let data = self.serializer.serialize_to_bytes(snapshot)?;
        self.sender.send(&data)?;
        Ok(true)
    }

    /// Flush the sender to ensure data is written
    pub fn flush(&mut self) -> Result<(), TransportError> {
        self.sender.flush()
    }

    pub fn last_frame(&self) -> u64 {
        self.current_frame
    }
}
