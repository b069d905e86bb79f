//! Raw control transfer seam

use crate::error::Result;

/// The two control transfer primitives a bootloader backend must provide
///
/// Both transfers are vendor requests on the default control pipe with
/// interface recipient (`bmRequestType` 0xC1 for IN, 0x41 for OUT). Any failure,
/// whether stall, disconnect or timeout, is reported as
/// [`Error::Transport`](crate::Error::Transport).
pub trait ControlTransport {
    /// Device-to-host vendor request, returning at most `length` bytes
    fn control_in(&mut self, request: u8, value: u16, index: u16, length: u16)
        -> Result<Vec<u8>>;

    /// Host-to-device vendor request with `data` as the payload
    fn control_out(&mut self, request: u8, value: u16, index: u16, data: &[u8]) -> Result<()>;
}

impl<T: ControlTransport + ?Sized> ControlTransport for Box<T> {
    fn control_in(
        &mut self,
        request: u8,
        value: u16,
        index: u16,
        length: u16,
    ) -> Result<Vec<u8>> {
        (**self).control_in(request, value, index, length)
    }

    fn control_out(&mut self, request: u8, value: u16, index: u16, data: &[u8]) -> Result<()> {
        (**self).control_out(request, value, index, data)
    }
}
