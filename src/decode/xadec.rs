//! Safe wrapper around the native `libxadec` XA decoder.
//!
//! The C interface bound here is an assumed one: no header ships with this
//! crate. The declarations below are the contract `libxadec` must export
//! (found via pkg-config when the `xadec` feature is on):
//!
//! ```c
//! typedef struct { uint32_t sample_rate; uint16_t channels; uint32_t pcm_samples; } XaFormat;
//! XaDecoder *xa_decoder_new(void);
//! void xa_decoder_free(XaDecoder *dec);
//! int xa_read_header(XaDecoder *dec, const uint8_t *src, size_t len, XaFormat *out);
//! int xa_decode(XaDecoder *dec, const uint8_t *src, size_t len,
//!               int16_t *pcm, size_t pcm_len, size_t *written);
//! int xa_get_format(const XaDecoder *dec, XaFormat *out);
//! ```
//!
//! Return codes: 0 ok, -1 header error, -2 payload error, -3 no format yet.

use std::ffi::c_int;

use super::engine::{EngineError, XaEngine};
use super::format::{FormatDescriptor, RawPcmSamples};

// ======================== FFI declarations ========================

/// Opaque type for XaDecoder
#[repr(C)]
pub struct XaDecoder {
    _private: [u8; 0],
}

#[repr(C)]
#[derive(Default)]
struct XaFormat {
    sample_rate: u32,
    channels: u16,
    pcm_samples: u32,
}

const XA_OK: c_int = 0;
const XA_ERR_HEADER: c_int = -1;
const XA_ERR_PAYLOAD: c_int = -2;
const XA_ERR_STATE: c_int = -3;

unsafe extern "C" {
    fn xa_decoder_new() -> *mut XaDecoder;
    fn xa_decoder_free(dec: *mut XaDecoder);
    fn xa_read_header(dec: *mut XaDecoder, src: *const u8, len: usize, out: *mut XaFormat)
        -> c_int;
    fn xa_decode(
        dec: *mut XaDecoder,
        src: *const u8,
        len: usize,
        pcm: *mut i16,
        pcm_len: usize,
        written: *mut usize,
    ) -> c_int;
    fn xa_get_format(dec: *const XaDecoder, out: *mut XaFormat) -> c_int;
}

fn check(code: c_int, what: &str) -> Result<(), EngineError> {
    match code {
        XA_OK => Ok(()),
        XA_ERR_HEADER => Err(EngineError::Header(format!("{}: invalid XA header", what))),
        XA_ERR_PAYLOAD => Err(EngineError::Payload(format!("{}: corrupt XA payload", what))),
        XA_ERR_STATE => Err(EngineError::FormatUnavailable),
        other => Err(EngineError::Payload(format!("{}: engine error {}", what, other))),
    }
}

impl From<XaFormat> for FormatDescriptor {
    fn from(f: XaFormat) -> Self {
        FormatDescriptor::new(f.sample_rate, f.channels).with_pcm_samples(f.pcm_samples as usize)
    }
}

// ======================== Engine ========================

/// One native decoder instance.
pub struct XadecEngine {
    dec: *mut XaDecoder,
}

// XaDecoder is only ever touched by the thread that owns the engine
unsafe impl Send for XadecEngine {}

impl XadecEngine {
    pub fn new() -> Self {
        let dec = unsafe { xa_decoder_new() };
        if dec.is_null() {
            log::error!("xa_decoder_new returned null");
        }
        Self { dec }
    }

    fn handle(&self) -> Result<*mut XaDecoder, EngineError> {
        if self.dec.is_null() {
            return Err(EngineError::Header(
                "native decoder could not be allocated".to_string(),
            ));
        }
        Ok(self.dec)
    }
}

impl Default for XadecEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl XaEngine for XadecEngine {
    fn read_header(&mut self, bytes: &[u8]) -> Result<FormatDescriptor, EngineError> {
        let dec = self.handle()?;
        let mut fmt = XaFormat::default();
        let code = unsafe { xa_read_header(dec, bytes.as_ptr(), bytes.len(), &mut fmt) };
        check(code, "read_header")?;
        Ok(fmt.into())
    }

    fn decode(&mut self, bytes: &[u8]) -> Result<RawPcmSamples, EngineError> {
        // The output size comes from the header, so parse it first
        let fmt = self.read_header(bytes)?;
        let capacity = fmt.pcm_samples.unwrap_or(0);
        let mut pcm = vec![0i16; capacity];
        let mut written: usize = 0;
        let code = unsafe {
            xa_decode(
                self.dec,
                bytes.as_ptr(),
                bytes.len(),
                pcm.as_mut_ptr(),
                pcm.len(),
                &mut written,
            )
        };
        check(code, "decode")?;
        pcm.truncate(written);
        Ok(pcm)
    }

    fn get_format(&self) -> Result<FormatDescriptor, EngineError> {
        let dec = self.handle()?;
        let mut fmt = XaFormat::default();
        let code = unsafe { xa_get_format(dec, &mut fmt) };
        check(code, "get_format")?;
        Ok(fmt.into())
    }
}

impl Drop for XadecEngine {
    fn drop(&mut self) {
        if !self.dec.is_null() {
            unsafe {
                xa_decoder_free(self.dec);
            }
        }
    }
}
