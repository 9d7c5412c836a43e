// 播放器子系统接口与播放状态

pub mod context;
pub mod demuxer;
#[cfg(feature = "dvb")]
pub mod dvb;
pub mod edl;
pub mod external_subtitle;
pub mod menu;
pub mod mixer;
pub mod osd;
pub mod pipeline;
pub mod playlist;
#[cfg(feature = "radio")]
pub mod radio;
pub mod status;
pub mod subtitles;
#[cfg(feature = "tv")]
pub mod tv;
pub mod video_out;

#[cfg(test)]
pub mod testing;

pub use context::{PlaybackContext, SeekMode, SeekRequest};
pub use demuxer::{Demuxer, TrackId};
pub use external_subtitle::{ExternalSubtitleParser, SubtitleTrack};
pub use mixer::{Mixer, SoftVolume, VolumeControl};
pub use osd::{OsdBarKind, OsdFunction, OsdSlot};
pub use status::StatusChannel;
