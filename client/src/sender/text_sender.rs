use log::debug;

use scenesync_shared::{
    Connector, Endpoint, ObjectId, ParameterValue, SceneData, SenderId, UpdateError,
};

use crate::{
    error::SenderError,
    sender::{
        publisher::{Publisher, PublisherSettings},
        ObjectSender,
    },
};

/// Publishes edits in the legacy text format read by renderer bridges:
/// `client <id>|<code>|<node path>|<values..>`
pub struct TextSender {
    target: Option<Endpoint>,
    settings: PublisherSettings,
    publisher: Option<Publisher>,
}

impl TextSender {
    pub const NAME: &'static str = "text";

    pub fn new(settings: PublisherSettings) -> Self {
        Self {
            target: None,
            settings,
            publisher: None,
        }
    }

    /// Encodes one edit as a text message, `None` for parameters the legacy
    /// bus has no code for
    pub fn encode(
        local_id: SenderId,
        scene: &SceneData,
        object_id: ObjectId,
        value: &ParameterValue,
    ) -> Result<Option<String>, UpdateError> {
        if let ParameterValue::ResendUpdate = value {
            return Ok(Some(format!("client {}|udOb", local_id)));
        }
        let Some((code, values)) = code_and_values(value) else {
            return Ok(None);
        };
        let path = scene.path_of(object_id).ok_or(UpdateError::UnknownObjectId {
            object_id,
            node_count: scene.node_count(),
        })?;

        let mut message = format!("client {}|{}|{}", local_id, code, path);
        for value in values {
            message.push('|');
            message.push_str(&value);
        }
        Ok(Some(message))
    }
}

impl Default for TextSender {
    fn default() -> Self {
        Self::new(PublisherSettings::default())
    }
}

fn code_and_values(value: &ParameterValue) -> Option<(char, Vec<String>)> {
    let floats = |values: &[f32]| -> Vec<String> { values.iter().map(f32::to_string).collect() };
    let encoded = match value {
        ParameterValue::Position(position) => ('t', floats(position)),
        ParameterValue::Rotation(rotation) => ('r', floats(rotation)),
        ParameterValue::Scale(scale) => ('s', floats(scale)),
        ParameterValue::Lock(locked) | ParameterValue::HiddenLock(locked) => {
            ('l', vec![text_bool(*locked)])
        }
        ParameterValue::Kinematic(kinematic) => ('k', vec![text_bool(*kinematic)]),
        ParameterValue::Color(color) => ('c', floats(color)),
        ParameterValue::Intensity(intensity) => ('i', floats(&[*intensity])),
        ParameterValue::Angle(angle) => ('a', floats(&[*angle])),
        ParameterValue::Range(range) => ('d', floats(&[*range])),
        ParameterValue::Fov(fov) => ('f', floats(&[*fov])),
        _ => return None,
    };
    Some(encoded)
}

// the legacy peers parse booleans the way .NET prints them
fn text_bool(value: bool) -> String {
    if value { "True" } else { "False" }.to_string()
}

impl ObjectSender for TextSender {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn set_target(&mut self, endpoint: Endpoint) {
        self.target = Some(endpoint);
    }

    fn target(&self) -> Option<&Endpoint> {
        self.target.as_ref()
    }

    fn start(&mut self, connector: &dyn Connector) -> Result<(), SenderError> {
        if self.is_running() {
            return Err(SenderError::AlreadyRunning {
                name: Self::NAME.to_string(),
            });
        }
        let target = self.target.as_ref().ok_or_else(|| SenderError::NoTarget {
            name: Self::NAME.to_string(),
        })?;
        let frame_sender = connector.connect_publisher(target)?;
        debug!("Text sender publishing to {}", target);
        self.publisher = Some(Publisher::start(Self::NAME, frame_sender, &self.settings)?);
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.publisher.as_ref().is_some_and(Publisher::is_running)
    }

    fn send_object(
        &mut self,
        local_id: SenderId,
        scene: &SceneData,
        object_id: ObjectId,
        value: &ParameterValue,
    ) -> Result<bool, SenderError> {
        let publisher = self.publisher.as_ref().ok_or_else(|| SenderError::NotRunning {
            name: Self::NAME.to_string(),
        })?;
        match Self::encode(local_id, scene, object_id, value)? {
            Some(message) => {
                publisher.enqueue(message.into_bytes())?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn finish(&mut self) {
        if let Some(mut publisher) = self.publisher.take() {
            publisher.stop();
        }
    }
}
