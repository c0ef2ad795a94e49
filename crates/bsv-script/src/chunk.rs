//! Script chunk parsing and encoding.
//!
//! A script chunk is either an opcode or a data push with its associated bytes.
//! Decoding walks the raw script one instruction at a time without giving
//! OP_RETURN any special treatment: everything after it is still parsed as
//! ordinary instructions, which is what node disassembly output expects.

use crate::opcodes::*;
use crate::ScriptError;

/// A single parsed element of a script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptChunk {
    /// The opcode byte. For direct pushes (1-75 bytes), this is the length.
    pub op: u8,
    /// The data payload, if this chunk is a push operation.
    pub data: Option<Vec<u8>>,
}

impl ScriptChunk {
    /// Whether this chunk pushes data (`OP_0`, direct pushes, `OP_PUSHDATA1/2/4`).
    pub fn is_push(&self) -> bool {
        is_push_opcode(self.op)
    }

    /// The pushed bytes, empty for `OP_0` and for non-push opcodes.
    pub fn payload(&self) -> &[u8] {
        self.data.as_deref().unwrap_or(&[])
    }
}

/// Read one instruction from `bytes` starting at `*pos`.
///
/// On success `*pos` is advanced past the instruction. Push opcodes carry
/// their payload in `data` (an empty vector for `OP_0`); all other opcodes
/// carry `None`. A push whose length prefix or payload runs past the end of
/// the script fails with `ScriptError::DataTooSmall` and leaves `*pos`
/// untouched.
pub fn read_op(bytes: &[u8], pos: &mut usize) -> Result<ScriptChunk, ScriptError> {
    let start = *pos;
    let op = *bytes.get(start).ok_or(ScriptError::DataTooSmall)?;
    if !is_push_opcode(op) {
        *pos = start + 1;
        return Ok(ScriptChunk { op, data: None });
    }

    let (prefix_len, length) = match op {
        OP_PUSHDATA1 => (1, read_len(bytes, start + 1, 1)?),
        OP_PUSHDATA2 => (2, read_len(bytes, start + 1, 2)?),
        OP_PUSHDATA4 => (4, read_len(bytes, start + 1, 4)?),
        _ => (0, op as usize),
    };

    let data_start = start + 1 + prefix_len;
    let data_end = data_start
        .checked_add(length)
        .filter(|end| *end <= bytes.len())
        .ok_or(ScriptError::DataTooSmall)?;

    *pos = data_end;
    Ok(ScriptChunk {
        op,
        data: Some(bytes[data_start..data_end].to_vec()),
    })
}

/// Little-endian length field of `width` bytes at `at`.
fn read_len(bytes: &[u8], at: usize, width: usize) -> Result<usize, ScriptError> {
    let field = bytes.get(at..at + width).ok_or(ScriptError::DataTooSmall)?;
    Ok(field
        .iter()
        .rev()
        .fold(0usize, |acc, b| (acc << 8) | *b as usize))
}

/// Decode raw script bytes into a vector of `ScriptChunk` values.
///
/// Fails on the first truncated push.
pub fn decode_script(bytes: &[u8]) -> Result<Vec<ScriptChunk>, ScriptError> {
    let mut chunks = Vec::new();
    let mut pos = 0;
    while pos < bytes.len() {
        chunks.push(read_op(bytes, &mut pos)?);
    }
    Ok(chunks)
}

/// Compute the OP_PUSHDATA prefix bytes for a data payload of the given length.
///
/// # Returns
/// The prefix to prepend to the data, or `ScriptError::DataTooBig` if the
/// length does not fit a 4-byte length field.
pub fn push_data_prefix(data_len: usize) -> Result<Vec<u8>, ScriptError> {
    if data_len <= OP_DATA_75 as usize {
        Ok(vec![data_len as u8])
    } else if data_len <= 0xFF {
        Ok(vec![OP_PUSHDATA1, data_len as u8])
    } else if data_len <= 0xFFFF {
        let mut buf = vec![OP_PUSHDATA2];
        buf.extend_from_slice(&(data_len as u16).to_le_bytes());
        Ok(buf)
    } else if data_len <= 0xFFFF_FFFF {
        let mut buf = vec![OP_PUSHDATA4];
        buf.extend_from_slice(&(data_len as u32).to_le_bytes());
        Ok(buf)
    } else {
        Err(ScriptError::DataTooBig)
    }
}

/// Encode `data` as the smallest push that leaves it on the stack.
///
/// Empty data and single bytes `1..=16` or `0x81` use `OP_0`, `OP_1`..`OP_16`
/// and `OP_1NEGATE`; everything else gets a length prefix.
pub fn encode_minimal_push(data: &[u8]) -> Result<Vec<u8>, ScriptError> {
    match data {
        [] => return Ok(vec![OP_0]),
        [b @ 1..=16] => return Ok(vec![OP_1 + b - 1]),
        [0x81] => return Ok(vec![OP_1NEGATE]),
        _ => {}
    }
    let mut out = push_data_prefix(data.len())?;
    out.extend_from_slice(data);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // read_op
    // -----------------------------------------------------------------------

    #[test]
    fn test_read_op_direct_push() {
        let bytes = [0x02, 0xaa, 0xbb, OP_DUP];
        let mut pos = 0;
        let chunk = read_op(&bytes, &mut pos).unwrap();
        assert_eq!(chunk.op, 0x02);
        assert_eq!(chunk.payload(), &[0xaa, 0xbb]);
        assert_eq!(pos, 3);

        let chunk = read_op(&bytes, &mut pos).unwrap();
        assert_eq!(chunk, ScriptChunk { op: OP_DUP, data: None });
        assert_eq!(pos, 4);
    }

    #[test]
    fn test_read_op_zero_is_empty_push() {
        let mut pos = 0;
        let chunk = read_op(&[OP_0], &mut pos).unwrap();
        assert!(chunk.is_push());
        assert_eq!(chunk.data, Some(vec![]));
    }

    #[test]
    fn test_read_op_pushdata_variants() {
        let mut script = vec![OP_PUSHDATA1, 3, 1, 2, 3];
        script.extend_from_slice(&[OP_PUSHDATA2, 2, 0, 9, 9]);
        script.extend_from_slice(&[OP_PUSHDATA4, 1, 0, 0, 0, 7]);
        let chunks = decode_script(&script).unwrap();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].payload(), &[1, 2, 3]);
        assert_eq!(chunks[1].payload(), &[9, 9]);
        assert_eq!(chunks[2].payload(), &[7]);
    }

    #[test]
    fn test_read_op_truncated_push() {
        let mut pos = 0;
        assert!(matches!(
            read_op(&[0x05, 0x01], &mut pos),
            Err(ScriptError::DataTooSmall)
        ));
        assert_eq!(pos, 0);
    }

    #[test]
    fn test_read_op_truncated_length_field() {
        let mut pos = 0;
        assert!(read_op(&[OP_PUSHDATA2, 0x01], &mut pos).is_err());
        assert!(read_op(&[OP_PUSHDATA4, 0xff, 0xff, 0xff, 0xff], &mut pos).is_err());
    }

    #[test]
    fn test_op_return_not_special() {
        let chunks = decode_script(&[OP_RETURN, 0x01, 0x2a, OP_DUP]).unwrap();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].op, OP_RETURN);
        assert_eq!(chunks[1].payload(), &[0x2a]);
        assert_eq!(chunks[2].op, OP_DUP);
    }

    // -----------------------------------------------------------------------
    // Push encoding
    // -----------------------------------------------------------------------

    #[test]
    fn test_push_data_prefix_boundaries() {
        assert_eq!(push_data_prefix(75).unwrap(), vec![75]);
        assert_eq!(push_data_prefix(76).unwrap(), vec![OP_PUSHDATA1, 76]);
        assert_eq!(push_data_prefix(255).unwrap(), vec![OP_PUSHDATA1, 255]);
        assert_eq!(push_data_prefix(256).unwrap(), vec![OP_PUSHDATA2, 0x00, 0x01]);
        assert_eq!(
            push_data_prefix(0x10000).unwrap(),
            vec![OP_PUSHDATA4, 0x00, 0x00, 0x01, 0x00]
        );
    }

    #[test]
    fn test_encode_minimal_push() {
        assert_eq!(encode_minimal_push(&[]).unwrap(), vec![OP_0]);
        assert_eq!(encode_minimal_push(&[5]).unwrap(), vec![OP_5]);
        assert_eq!(encode_minimal_push(&[0x81]).unwrap(), vec![OP_1NEGATE]);
        assert_eq!(encode_minimal_push(&[0]).unwrap(), vec![0x01, 0x00]);
        assert_eq!(encode_minimal_push(&[0xab, 0xcd]).unwrap(), vec![0x02, 0xab, 0xcd]);
    }
}
