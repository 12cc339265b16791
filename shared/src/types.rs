/// Index of a node in the flattened, pre-order scene node list
pub type ObjectId = i32;
/// Wire identity of a live update participant
pub type SenderId = u8;
