use crate::opcode_tables::{self, OpcodeSpec, Shape};
use std::fmt::{Display, Error, Formatter};

/// A decoded event instruction
#[derive(Debug, Clone)]
pub struct Instruction {
    /// The raw opcode word
    pub code: i16,
    /// Descriptor, None for opcode numbers outside the table
    pub spec: Option<&'static OpcodeSpec>,
    /// Argument words, exactly the opcode's arity
    pub args: Vec<i16>,
    /// (true, false) jump distances of a condition opcode
    pub jumps: Option<(i16, i16)>,
    /// Total size in words
    pub size: usize,
}

impl Instruction {
    /// Decode the instruction starting at `ip`.
    ///
    /// Unknown opcodes decode as a one-word instruction so the caller can skip them.
    /// An instruction whose arguments run past the end of the stream is an error.
    pub fn decode(stream: &[i16], ip: usize) -> Result<Self, String> {
        let code = *stream
            .get(ip)
            .ok_or_else(|| format!("Instruction address {} out of bounds", ip))?;

        let spec = match opcode_tables::lookup(code) {
            Some(spec) => spec,
            None => {
                return Ok(Instruction {
                    code,
                    spec: None,
                    args: Vec::new(),
                    jumps: None,
                    size: 1,
                })
            }
        };

        let size = spec.size();
        if ip + size > stream.len() {
            return Err(format!(
                "{} at {} needs {} words, stream has {}",
                spec.name,
                ip,
                size,
                stream.len() - ip
            ));
        }

        let args_end = ip + 1 + spec.arity;
        let args = stream[ip + 1..args_end].to_vec();
        let jumps = match spec.shape {
            Shape::Plain => None,
            Shape::Condition => Some((stream[args_end], stream[args_end + 1])),
            Shape::Battle => Some((args[1], args[2])),
        };

        Ok(Instruction {
            code,
            spec: Some(spec),
            args,
            jumps,
            size,
        })
    }

    pub fn name(&self) -> &'static str {
        self.spec.map(|s| s.name).unwrap_or("unknown")
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{}", self.name())?;
        if self.spec.is_none() {
            write!(f, " ({})", self.code)?;
        }
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        if let Some((t, e)) = self.jumps {
            write!(f, " ? +{} : +{}", t, e)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plain() {
        let stream = [1, 1001, 5, 0, -1];
        let inst = Instruction::decode(&stream, 0).unwrap();
        assert_eq!(inst.name(), "talk");
        assert_eq!(inst.args, vec![1001, 5, 0]);
        assert_eq!(inst.jumps, None);
        assert_eq!(inst.size, 4);
        assert_eq!(inst.to_string(), "talk 1001 5 0");
    }

    #[test]
    fn test_decode_condition_reads_jump_pair() {
        let stream = [18, 12, 0, 4];
        let inst = Instruction::decode(&stream, 0).unwrap();
        assert_eq!(inst.args, vec![12]);
        assert_eq!(inst.jumps, Some((0, 4)));
        assert_eq!(inst.size, 4);
    }

    #[test]
    fn test_decode_battle_reads_inner_jump_pair() {
        let stream = [6, 50, 0, 4, 1];
        let inst = Instruction::decode(&stream, 0).unwrap();
        assert_eq!(inst.args, vec![50, 0, 4, 1]);
        assert_eq!(inst.jumps, Some((0, 4)));
        assert_eq!(inst.size, 5);
        assert_eq!(inst.to_string(), "battle 50 0 4 1 ? +0 : +4");
    }

    #[test]
    fn test_unknown_opcode_is_one_word() {
        let stream = [300, 1, 2];
        let inst = Instruction::decode(&stream, 0).unwrap();
        assert!(inst.spec.is_none());
        assert_eq!(inst.size, 1);
    }

    #[test]
    fn test_truncated_instruction_is_error() {
        assert!(Instruction::decode(&[1, 1001, 5], 0).is_err());
        assert!(Instruction::decode(&[18, 12, 0], 0).is_err());
        assert!(Instruction::decode(&[-1], 1).is_err());
    }
}
