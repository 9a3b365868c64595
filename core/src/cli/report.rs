use crate::api::RecordMetadata;
use crate::dataset::{HemorrhageDataset, Sample};
use ndarray::Axis;
use std::fmt;

/// Text report formatter for record metadata
pub struct TextReport<'a> {
    metadata: &'a RecordMetadata,
}

impl<'a> TextReport<'a> {
    /// Creates a new text report
    pub fn new(metadata: &'a RecordMetadata) -> Self {
        Self { metadata }
    }
}

impl<'a> fmt::Display for TextReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CT Slice Metadata")?;
        writeln!(f, "=================")?;
        writeln!(f)?;
        writeln!(f, "Patient:        {}", self.metadata.patient_id)?;
        writeln!(f, "Study:          {}", self.metadata.study_instance_uid)?;
        writeln!(f, "Series:         {}", self.metadata.series_instance_uid)?;
        writeln!(
            f,
            "SOP Instance:   {}",
            self.metadata.sop_instance_uid.as_deref().unwrap_or("unknown")
        )?;
        writeln!(
            f,
            "Modality:       {}",
            self.metadata.modality.as_deref().unwrap_or("unknown")
        )?;
        writeln!(f, "Window:         {}", self.metadata.window())?;
        writeln!(f, "Rescale Slope:  {}", self.metadata.rescale_slope)?;
        writeln!(f, "Rescale Intercept: {}", self.metadata.rescale_intercept)?;

        Ok(())
    }
}

/// Record counts and policies of a constructed dataset
pub struct SummaryReport<'a> {
    dataset: &'a HemorrhageDataset,
}

impl<'a> SummaryReport<'a> {
    pub fn new(dataset: &'a HemorrhageDataset) -> Self {
        Self { dataset }
    }
}

impl<'a> fmt::Display for SummaryReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let positives = self.dataset.positives();
        writeln!(f, "Dataset Summary")?;
        writeln!(f, "===============")?;
        writeln!(f)?;
        writeln!(f, "Records:        {}", self.dataset.len())?;
        writeln!(f, "Positive:       {}", positives)?;
        writeln!(f, "Negative:       {}", self.dataset.len() - positives)?;
        writeln!(f, "Dataset Policy: {}", self.dataset.dataset_policy())?;
        writeln!(f, "Window Policy:  {}", self.dataset.window_policy())?;
        writeln!(
            f,
            "Labels:         {}",
            self.dataset.vocabulary().names().join(", ")
        )?;

        Ok(())
    }
}

/// Shape, channel statistics and target of one sample
pub struct SampleReport<'a> {
    sample: &'a Sample,
    labels: &'a [String],
}

impl<'a> SampleReport<'a> {
    pub fn new(sample: &'a Sample, labels: &'a [String]) -> Self {
        Self { sample, labels }
    }
}

impl<'a> fmt::Display for SampleReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (rows, cols, channels) = self.sample.image.dim();
        writeln!(f, "Sample {}", self.sample.id)?;
        writeln!(f, "Shape:          {}x{}x{}", rows, cols, channels)?;

        for (ch, channel) in self.sample.image.axis_iter(Axis(2)).enumerate() {
            let (min, max) = channel
                .iter()
                .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                    (lo.min(v), hi.max(v))
                });
            writeln!(
                f,
                "Channel {}:      mean {:.4} min {:.4} max {:.4}",
                ch,
                channel.mean().unwrap_or(0.0),
                min,
                max
            )?;
        }

        writeln!(f, "Target:")?;
        for (name, value) in self.labels.iter().zip(self.sample.target.iter()) {
            writeln!(f, "  {:<18}{:.2}", name, value)?;
        }

        Ok(())
    }
}
