//! Sinks consuming sampled snapshots of the field.

use std::io::Write;

use nalgebra::Point2;

use crate::fdtd::field::FieldState;

/// Field values at one cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub point: Point2<usize>,
    pub ez: f64,
    pub hy: f64,
    pub hx: f64,
}

/// Every `stride`-th cell in both directions, x in the outer loop.
pub fn samples(field: &FieldState, stride: usize) -> impl Iterator<Item = Sample> + '_ {
    let size = *field.strider().size();
    let n = field.strider().row_len();
    let stride = stride.max(1);

    (0..size.x).step_by(stride).flat_map(move |x| {
        (0..size.y).step_by(stride).map(move |y| {
            let index = x + y * n;
            Sample {
                point: Point2::new(x, y),
                ez: field.ez()[index],
                hy: field.hy()[index],
                hx: field.hx()[index],
            }
        })
    })
}

pub trait SampleSink {
    fn write_block(&mut self, tick: usize, field: &FieldState) -> Result<(), std::io::Error>;

    fn finish(&mut self) -> Result<(), std::io::Error> {
        Ok(())
    }
}

/// Blocked text format for plotting tools.
///
/// One tab-separated line `t x y Ez Hy Hx` per sample, with a trailing tab.
/// Blocks are separated by two newlines.
#[derive(Debug)]
pub struct TextSink<W> {
    writer: W,
    stride: usize,
}

impl<W: Write> TextSink<W> {
    pub fn new(writer: W, stride: usize) -> Self {
        Self { writer, stride }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> SampleSink for TextSink<W> {
    fn write_block(&mut self, tick: usize, field: &FieldState) -> Result<(), std::io::Error> {
        for sample in samples(field, self.stride) {
            writeln!(
                self.writer,
                "{tick}\t{}\t{}\t{}\t{}\t{}\t",
                sample.point.x, sample.point.y, sample.ez, sample.hy, sample.hx
            )?;
        }
        write!(self.writer, "\n\n")
    }

    fn finish(&mut self) -> Result<(), std::io::Error> {
        self.writer.flush()
    }
}

/// Keeps all sampled blocks in memory.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    stride: usize,
    blocks: Vec<(usize, Vec<Sample>)>,
}

impl MemorySink {
    pub fn new(stride: usize) -> Self {
        Self {
            stride,
            blocks: vec![],
        }
    }

    /// `(tick, samples)` in the order they were written.
    pub fn blocks(&self) -> &[(usize, Vec<Sample>)] {
        &self.blocks
    }
}

impl SampleSink for MemorySink {
    fn write_block(&mut self, tick: usize, field: &FieldState) -> Result<(), std::io::Error> {
        self.blocks
            .push((tick, samples(field, self.stride).collect()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::Point2;

    use crate::{
        fdtd::{
            field::{
                FieldComponent,
                FieldState,
            },
            lattice::Strider,
        },
        output::{
            MemorySink,
            SampleSink,
            TextSink,
            samples,
        },
    };

    #[test]
    fn samples_are_strided_with_x_outer() {
        let field = FieldState::new(&Strider::square(11));
        let points = samples(&field, 5)
            .map(|sample| sample.point)
            .collect::<Vec<_>>();
        let expected = [(0, 0), (0, 5), (0, 10), (5, 0), (5, 5), (5, 10), (10, 0), (10, 5), (10, 10)]
            .map(|(x, y)| Point2::new(x, y));
        assert_eq!(points, expected);
    }

    #[test]
    fn text_format() {
        let mut field = FieldState::new(&Strider::square(6));
        field.set(FieldComponent::Ez, &Point2::new(5, 0), 1.5);
        field.set(FieldComponent::Hy, &Point2::new(5, 0), -0.25);
        field.set(FieldComponent::Hx, &Point2::new(0, 5), 2.0);

        let mut sink = TextSink::new(vec![], 5);
        sink.write_block(3, &field).unwrap();
        sink.write_block(8, &FieldState::new(&Strider::square(6))).unwrap();
        sink.finish().unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();

        assert_eq!(
            text,
            "3\t0\t0\t0\t0\t0\t\n\
             3\t0\t5\t0\t0\t2\t\n\
             3\t5\t0\t1.5\t-0.25\t0\t\n\
             3\t5\t5\t0\t0\t0\t\n\
             \n\n\
             8\t0\t0\t0\t0\t0\t\n\
             8\t0\t5\t0\t0\t0\t\n\
             8\t5\t0\t0\t0\t0\t\n\
             8\t5\t5\t0\t0\t0\t\n\
             \n\n"
        );
    }

    #[test]
    fn memory_sink_keeps_blocks() {
        let mut field = FieldState::new(&Strider::square(4));
        field.set(FieldComponent::Ez, &Point2::new(2, 2), 1.0);

        let mut sink = MemorySink::new(2);
        sink.write_block(0, &field).unwrap();
        sink.write_block(5, &field).unwrap();

        assert_eq!(sink.blocks().len(), 2);
        assert_eq!(sink.blocks()[1].0, 5);
        let samples = &sink.blocks()[0].1;
        assert_eq!(samples.len(), 4);
        assert_eq!(samples[3].point, Point2::new(2, 2));
        assert_eq!(samples[3].ez, 1.0);
    }
}
