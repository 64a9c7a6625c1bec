//! Course syllabus as listed on a didattica course page.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Syllabus {
    pub course: String,
    pub professor: String,
    pub lectures: Vec<SyllabusLecture>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyllabusLecture {
    pub title: String,
    pub date: String,
    pub topics: Vec<String>,
}

/// Plain-text layout used both for printing and for `--save`.
impl fmt::Display for Syllabus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Course: {}", self.course)?;
        writeln!(f, "Professor: {}", self.professor)?;
        writeln!(f)?;
        for lecture in &self.lectures {
            writeln!(f, "{} - {}", lecture.title, lecture.date)?;
            for topic in &lecture.topics {
                writeln!(f, "    {}", topic)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
