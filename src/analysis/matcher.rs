//! Sliding-window matcher for opcode-category patterns.

use crate::core::{Instruction, OpcodeCategory};

/// All start indices where `pattern` matches `instructions` category-wise.
///
/// Indices are ascending and overlapping matches are reported. Returns an
/// empty vector (never an error) when the sequence is shorter than the
/// pattern or nothing matches. Pure function of its inputs.
pub fn find_all(instructions: &[Instruction], pattern: &[OpcodeCategory]) -> Vec<usize> {
    if pattern.is_empty() || instructions.len() < pattern.len() {
        return Vec::new();
    }
    (0..=instructions.len() - pattern.len())
        .filter(|&i| {
            pattern
                .iter()
                .enumerate()
                .all(|(j, category)| instructions[i + j].category == *category)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Instruction;
    use OpcodeCategory::{Add, Cmp, Jmp, Jnz, Mov};

    fn seq(categories: &[OpcodeCategory]) -> Vec<Instruction> {
        categories
            .iter()
            .enumerate()
            .map(|(i, &c)| Instruction::new(0x1000 + 4 * i as u64, c, vec![]))
            .collect()
    }

    #[test]
    fn test_all_matching_windows_in_ascending_order() {
        let insns = seq(&[Mov, Cmp, Jnz, Mov, Cmp, Jnz, Add]);
        assert_eq!(find_all(&insns, &[Cmp, Jnz]), vec![1, 4]);
    }

    #[test]
    fn test_overlapping_matches_reported() {
        let insns = seq(&[Mov, Mov, Mov]);
        assert_eq!(find_all(&insns, &[Mov, Mov]), vec![0, 1]);
    }

    #[test]
    fn test_empty_when_sequence_shorter_than_pattern() {
        let insns = seq(&[Cmp, Jnz]);
        assert!(find_all(&insns, &[Cmp, Jnz, Mov, Jmp]).is_empty());
    }

    #[test]
    fn test_empty_when_no_window_matches() {
        let insns = seq(&[Mov, Add, Mov]);
        assert!(find_all(&insns, &[Cmp, Jnz]).is_empty());
    }

    #[test]
    fn test_whole_sequence_match_at_zero() {
        let insns = seq(&[Cmp, Jnz, Mov, Jmp]);
        assert_eq!(find_all(&insns, &[Cmp, Jnz, Mov, Jmp]), vec![0]);
    }
}
