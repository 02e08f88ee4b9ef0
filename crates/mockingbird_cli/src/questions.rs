//! Static question bank.

use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use mockingbird::{Difficulty, Question};

pub static QUESTION_BANK: Lazy<Vec<Question>> = Lazy::new(|| {
    use Difficulty::*;

    let table: [(&str, &str, Difficulty); 12] = [
        (
            "two_sum",
            "Given an array of integers nums and an integer target, return indices of the two numbers such that they add up to target.",
            Easy,
        ),
        (
            "reverse_string",
            "Write a function that reverses a string. The input string is given as an array of characters.",
            Easy,
        ),
        (
            "valid_palindrome",
            "Given a string s, return true if it is a palindrome (reads the same forward and backward), or false otherwise. Consider only alphanumeric characters and ignore cases.",
            Easy,
        ),
        (
            "merge_two_sorted_lists",
            "You are given the heads of two sorted linked lists. Merge the two lists into one sorted list by splicing together the nodes of the first two lists.",
            Easy,
        ),
        (
            "climbing_stairs",
            "You are climbing a staircase. It takes n steps to reach the top. Each time you can either climb 1 or 2 steps. In how many distinct ways can you climb to the top?",
            Easy,
        ),
        (
            "binary_tree_inorder",
            "Given the root of a binary tree, return the inorder traversal of its nodes' values.",
            Easy,
        ),
        (
            "maximum_subarray",
            "Given an integer array nums, find the contiguous subarray (containing at least one number) which has the largest sum and return its sum.",
            Medium,
        ),
        (
            "add_two_numbers",
            "You are given two non-empty linked lists representing two non-negative integers. The digits are stored in reverse order, and each of their nodes contains a single digit. Add the two numbers and return the sum as a linked list.",
            Medium,
        ),
        (
            "longest_substring",
            "Given a string s, find the length of the longest substring without repeating characters.",
            Medium,
        ),
        (
            "container_with_water",
            "You are given an integer array height of length n. There are n vertical lines drawn such that the two endpoints of the ith line are (i, 0) and (i, height[i]). Find two lines that together with the x-axis form a container that holds the most water.",
            Medium,
        ),
        (
            "median_sorted_arrays",
            "Given two sorted arrays nums1 and nums2 of size m and n respectively, return the median of the two sorted arrays.",
            Hard,
        ),
        (
            "regular_expression_matching",
            "Given an input string s and a pattern p, implement regular expression matching with support for '.' and '*' where '.' matches any single character and '*' matches zero or more of the preceding element.",
            Hard,
        ),
    ];

    table
        .into_iter()
        .map(|(id, description, difficulty)| Question::new(id, description, difficulty))
        .collect()
});

/// Uniform picks from [`QUESTION_BANK`].
#[derive(Debug)]
pub struct QuestionPicker {
    rng: StdRng,
}

impl Default for QuestionPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl QuestionPicker {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic sequence for tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn pick(&mut self) -> Question {
        pick_question(&QUESTION_BANK, &mut self.rng)
    }
}

pub fn pick_question<R: rand::Rng + ?Sized>(bank: &[Question], rng: &mut R) -> Question {
    bank.choose(rng).cloned().unwrap_or_else(|| {
        Question::new("freeform", "Discuss a problem of your choice.", Difficulty::Easy)
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn bank_ids_are_unique_and_cover_every_difficulty() {
        let ids: HashSet<_> = QUESTION_BANK.iter().map(|question| question.id.as_str()).collect();
        assert_eq!(ids.len(), QUESTION_BANK.len());

        let count = |difficulty| {
            QUESTION_BANK
                .iter()
                .filter(|question| question.difficulty == difficulty)
                .count()
        };
        assert_eq!(count(Difficulty::Easy), 6);
        assert_eq!(count(Difficulty::Medium), 4);
        assert_eq!(count(Difficulty::Hard), 2);
    }

    #[test]
    fn seeded_pickers_agree() {
        let mut left = QuestionPicker::seeded(7);
        let mut right = QuestionPicker::seeded(7);
        for _ in 0..5 {
            assert_eq!(left.pick(), right.pick());
        }
    }

    #[test]
    fn picks_come_from_the_bank() {
        let mut picker = QuestionPicker::seeded(42);
        for _ in 0..20 {
            let question = picker.pick();
            assert!(QUESTION_BANK.contains(&question));
        }
    }

    #[test]
    fn empty_bank_falls_back_to_a_freeform_question() {
        let mut rng = StdRng::seed_from_u64(1);
        let question = pick_question(&[], &mut rng);
        assert_eq!(question.id, "freeform");
    }
}
