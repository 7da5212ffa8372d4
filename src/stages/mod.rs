pub mod stage0_segment;
pub mod stage1_panels;
pub mod stage2_header;
pub mod stage3_utterances;
pub mod stage4_resolve;
pub mod stage5_assemble;

pub use stage0_segment::*;
pub use stage1_panels::*;
pub use stage2_header::*;
pub use stage3_utterances::*;
pub use stage4_resolve::*;
pub use stage5_assemble::*;
