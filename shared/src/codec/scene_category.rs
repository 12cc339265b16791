use std::fmt;

/// One of the six independently decodable scene buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneCategory {
    Header,
    Textures,
    Objects,
    Characters,
    Materials,
    Nodes,
}

impl SceneCategory {
    /// Transfer order: the header first since texture records depend on it,
    /// nodes last so a client can build the graph once resources are in
    pub const TRANSFER_ORDER: [SceneCategory; 6] = [
        SceneCategory::Header,
        SceneCategory::Textures,
        SceneCategory::Objects,
        SceneCategory::Characters,
        SceneCategory::Materials,
        SceneCategory::Nodes,
    ];

    /// ASCII request sent on the scene transfer bus
    pub fn command(self) -> &'static str {
        match self {
            SceneCategory::Header => "header",
            SceneCategory::Textures => "textures",
            SceneCategory::Objects => "objects",
            SceneCategory::Characters => "character",
            SceneCategory::Materials => "materials",
            SceneCategory::Nodes => "nodes",
        }
    }

    pub fn from_command(command: &[u8]) -> Option<Self> {
        Self::TRANSFER_ORDER
            .into_iter()
            .find(|category| category.command().as_bytes() == command)
    }

    /// Categories a bandwidth-limited client may skip
    pub fn is_optional(self) -> bool {
        matches!(
            self,
            SceneCategory::Textures | SceneCategory::Materials | SceneCategory::Characters
        )
    }
}

impl fmt::Display for SceneCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command())
    }
}
