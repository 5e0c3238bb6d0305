//! Core types: raw frames and decoded records

use crate::constants::{
    ControlWord, CAPTURE_TIME_OFFSET, CONTROL_WORD_OFFSET, FRAME_LEN, PRIMARY_SYNC,
    SECONDARY_SYNC, SECONDARY_SYNC_OFFSET,
};
use crate::error::FrameError;
use alloc::borrow::Cow;
use serde::{Deserialize, Serialize};

/// One 28-byte frame, either borrowed from the input buffer or spliced
/// together by the resynchronizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame<'a> {
    bytes: Cow<'a, [u8; FRAME_LEN]>,
}

impl<'a> RawFrame<'a> {
    /// Wrap a frame-sized window of the input buffer
    pub fn borrowed(bytes: &'a [u8; FRAME_LEN]) -> Self {
        Self {
            bytes: Cow::Borrowed(bytes),
        }
    }

    /// Wrap a frame reassembled from displaced bytes
    pub fn spliced(bytes: [u8; FRAME_LEN]) -> RawFrame<'static> {
        RawFrame {
            bytes: Cow::Owned(bytes),
        }
    }

    /// Strictly parse a frame: exactly [`FRAME_LEN`] bytes with both sync
    /// markers in place
    pub fn from_slice(data: &'a [u8]) -> Result<Self, FrameError> {
        let bytes: &'a [u8; FRAME_LEN] =
            data.try_into()
                .map_err(|_| FrameError::IncompleteFrame {
                    expected: FRAME_LEN,
                    actual: data.len(),
                })?;
        let frame = Self::borrowed(bytes);

        if !frame.has_primary_sync() {
            return Err(FrameError::BadPrimarySync([bytes[0], bytes[1]]));
        }
        if !frame.has_secondary_sync() {
            let mut found = [0u8; 4];
            found.copy_from_slice(&bytes[SECONDARY_SYNC_OFFSET..CONTROL_WORD_OFFSET]);
            return Err(FrameError::BadSecondarySync(found));
        }

        Ok(frame)
    }

    /// The frame bytes
    pub fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.bytes
    }

    /// Whether this frame was reassembled rather than read in place
    pub fn is_spliced(&self) -> bool {
        matches!(self.bytes, Cow::Owned(_))
    }

    /// Check the primary marker at offset 0
    pub fn has_primary_sync(&self) -> bool {
        &self.bytes[..PRIMARY_SYNC.len()] == PRIMARY_SYNC
    }

    /// Check the secondary marker at its fixed offset
    pub fn has_secondary_sync(&self) -> bool {
        &self.bytes[SECONDARY_SYNC_OFFSET..CONTROL_WORD_OFFSET] == SECONDARY_SYNC
    }

    /// Bytes from the control word to the end of the frame
    pub fn payload(&self) -> &[u8] {
        &self.bytes[CONTROL_WORD_OFFSET..]
    }

    /// Relay receipt time in seconds since the Unix epoch
    pub fn capture_time(&self) -> f64 {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&self.bytes[CAPTURE_TIME_OFFSET..CAPTURE_TIME_OFFSET + 8]);
        f64::from_be_bytes(raw)
    }

    /// The control word following the secondary marker
    pub fn control_word(&self) -> ControlWord {
        let b = &self.bytes[CONTROL_WORD_OFFSET..CONTROL_WORD_OFFSET + 4];
        ControlWord::new(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Detach from the input buffer
    pub fn into_owned(self) -> RawFrame<'static> {
        RawFrame::spliced(self.bytes.into_owned())
    }
}

/// The two mutually exclusive frame kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameKind {
    /// Four-channel science event
    Science,
    /// Single housekeeping channel reading
    Housekeeping,
}

/// A decoded science event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScienceSample {
    /// Relay receipt time, seconds since the Unix epoch
    pub capture_time: f64,

    /// Event was commanded rather than detected
    pub is_commanded: bool,

    /// Instrument timestamp, 30 bits, milliseconds
    pub timestamp_ticks: u32,

    /// Channel 1 voltage
    pub channel1: f64,

    /// Channel 2 voltage
    pub channel2: f64,

    /// Channel 3 voltage
    pub channel3: f64,

    /// Channel 4 voltage
    pub channel4: f64,
}

impl ScienceSample {
    /// Instrument timestamp in seconds
    pub fn timestamp_seconds(&self) -> f64 {
        f64::from(self.timestamp_ticks) / 1e3
    }

    /// The four channel voltages in order
    pub fn channels(&self) -> [f64; 4] {
        [self.channel1, self.channel2, self.channel3, self.channel4]
    }
}

/// A decoded housekeeping reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HousekeepingSample {
    /// Relay receipt time, seconds since the Unix epoch
    pub capture_time: f64,

    /// Instrument timestamp, 30 bits, milliseconds
    pub timestamp_ticks: u32,

    /// Channel id, 0-15
    pub channel_id: u8,

    /// Channel value; shifted left by 4 except on channels 10 and 11
    pub raw_value: u16,

    /// Events since the previous housekeeping frame
    pub delta_event_count: u32,

    /// Dropped events since the previous housekeeping frame
    pub delta_dropped_count: u32,

    /// Lost events since the previous housekeeping frame
    pub delta_lost_count: u32,
}

impl HousekeepingSample {
    /// Instrument timestamp in seconds
    pub fn timestamp_seconds(&self) -> f64 {
        f64::from(self.timestamp_ticks) / 1e3
    }

    /// Named channel for this reading
    pub fn channel(&self) -> Option<HkChannel> {
        HkChannel::from_id(self.channel_id)
    }
}

/// Result of decoding one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecodedRecord {
    /// Science frame
    Science(ScienceSample),
    /// Housekeeping frame
    Housekeeping(HousekeepingSample),
    /// Frame whose fields could not be extracted
    Unclassifiable,
}

impl DecodedRecord {
    /// Frame kind, if the record was classified
    pub fn kind(&self) -> Option<FrameKind> {
        match self {
            DecodedRecord::Science(_) => Some(FrameKind::Science),
            DecodedRecord::Housekeeping(_) => Some(FrameKind::Housekeeping),
            DecodedRecord::Unclassifiable => None,
        }
    }

    /// Relay receipt time, if the record was classified
    pub fn capture_time(&self) -> Option<f64> {
        match self {
            DecodedRecord::Science(s) => Some(s.capture_time),
            DecodedRecord::Housekeeping(h) => Some(h.capture_time),
            DecodedRecord::Unclassifiable => None,
        }
    }

    /// The science sample, if any
    pub fn as_science(&self) -> Option<&ScienceSample> {
        match self {
            DecodedRecord::Science(s) => Some(s),
            _ => None,
        }
    }

    /// The housekeeping sample, if any
    pub fn as_housekeeping(&self) -> Option<&HousekeepingSample> {
        match self {
            DecodedRecord::Housekeeping(h) => Some(h),
            _ => None,
        }
    }
}

/// What a housekeeping channel id measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HkChannel {
    /// Pin puller temperature
    PinPullerTemp,
    /// Optics temperature
    OpticsTemp,
    /// Instrument base temperature
    BaseTemp,
    /// HV supply temperature
    HvSupplyTemp,
    /// +5.2 V supply current monitor
    Imon5V2,
    /// +10 V supply current monitor
    Imon10V,
    /// +3.3 V supply current monitor
    Imon3V3,
    /// Anode voltage monitor
    AnodeVoltMon,
    /// +28 V supply current monitor
    Imon28V,
    /// ADC ground reference
    AdcGround,
    /// Command counter
    CmdCount,
    /// Pin puller armed flag
    PinPullerArmed,
    /// Unused slot 12
    Unused1,
    /// Unused slot 13
    Unused2,
    /// MCP HV after automatic change
    HvMcpAuto,
    /// MCP HV after manual change
    HvMcpManual,
}

impl HkChannel {
    const ALL: [HkChannel; 16] = [
        HkChannel::PinPullerTemp,
        HkChannel::OpticsTemp,
        HkChannel::BaseTemp,
        HkChannel::HvSupplyTemp,
        HkChannel::Imon5V2,
        HkChannel::Imon10V,
        HkChannel::Imon3V3,
        HkChannel::AnodeVoltMon,
        HkChannel::Imon28V,
        HkChannel::AdcGround,
        HkChannel::CmdCount,
        HkChannel::PinPullerArmed,
        HkChannel::Unused1,
        HkChannel::Unused2,
        HkChannel::HvMcpAuto,
        HkChannel::HvMcpManual,
    ];

    /// Look up a channel by its 4-bit id
    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(usize::from(id)).copied()
    }

    /// The 4-bit channel id
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Column-style name used in tabular exports
    pub const fn name(self) -> &'static str {
        match self {
            HkChannel::PinPullerTemp => "PinPullerTemp",
            HkChannel::OpticsTemp => "OpticsTemp",
            HkChannel::BaseTemp => "LEXIbaseTemp",
            HkChannel::HvSupplyTemp => "HVsupplyTemp",
            HkChannel::Imon5V2 => "+5.2V_Imon",
            HkChannel::Imon10V => "+10V_Imon",
            HkChannel::Imon3V3 => "+3.3V_Imon",
            HkChannel::AnodeVoltMon => "AnodeVoltMon",
            HkChannel::Imon28V => "+28V_Imon",
            HkChannel::AdcGround => "ADC_Ground",
            HkChannel::CmdCount => "Cmd_count",
            HkChannel::PinPullerArmed => "Pinpuller_Armed",
            HkChannel::Unused1 => "Unused1",
            HkChannel::Unused2 => "Unused2",
            HkChannel::HvMcpAuto => "HVmcpAuto",
            HkChannel::HvMcpManual => "HVmcpMan",
        }
    }
}
