/// Command surface of the external media driver (video or audio hardware).
///
/// Every call is best-effort: the driver may be detached, in which case the
/// player keeps its own state consistent and skips the call.
pub trait MediaDriver {
    fn play(&mut self);
    fn pause(&mut self);
    fn seek(&mut self, seconds: f64);
    /// Volume in `0..=100`
    fn set_volume(&mut self, volume: u8);
    fn set_rate(&mut self, rate: f64);
    fn mute(&mut self);
    fn unmute(&mut self);
}
