use esynth::workflows::enumerate::AcceptedComplex;
use serde::Serialize;
use std::io::Write;

const HEADER: [&str; 7] = [
    "index",
    "name",
    "depth",
    "atoms",
    "bonds",
    "open_valence",
    "score",
];

#[derive(Debug, Serialize)]
struct ComplexRecord<'a> {
    index: String,
    name: &'a str,
    depth: usize,
    atoms: usize,
    bonds: usize,
    open_valence: usize,
    score: Option<f64>,
}

impl<'a> From<&'a AcceptedComplex> for ComplexRecord<'a> {
    fn from(accepted: &'a AcceptedComplex) -> Self {
        let complex = &accepted.complex;
        Self {
            index: complex.index().to_string(),
            name: complex.name(),
            depth: complex.depth(),
            atoms: complex.structure().atom_count(),
            bonds: complex.structure().bond_count(),
            open_valence: complex.open_valence(),
            score: accepted.score,
        }
    }
}

/// Streams accepted complexes into a CSV table, one row per complex.
/// The header is written on construction, before any row.
pub struct ComplexWriter<W: Write> {
    writer: csv::Writer<W>,
    rows: usize,
}

impl<W: Write> ComplexWriter<W> {
    pub fn new(inner: W) -> Result<Self, csv::Error> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(inner);
        writer.write_record(HEADER)?;
        Ok(Self { writer, rows: 0 })
    }

    pub fn write(&mut self, accepted: &AcceptedComplex) -> Result<(), csv::Error> {
        self.writer.serialize(ComplexRecord::from(accepted))?;
        self.rows += 1;
        Ok(())
    }

    pub fn finish(mut self) -> Result<usize, csv::Error> {
        self.writer.flush()?;
        Ok(self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use esynth::core::chem::GraphChemistry;
    use esynth::core::library::FragmentLibrary;
    use esynth::engine::acceptance::AcceptanceFilter;
    use esynth::engine::config::AssemblyConfigBuilder;
    use esynth::engine::progress::ProgressReporter;
    use esynth::workflows::enumerate;

    const LIBRARY: &str = r#"
[[brick]]
name = "amine"
atoms = ["C", "N"]
bonds = [[0, 1, 1]]
[[brick.sites]]
atom = 1
type = "N.am"
allow = ["C.co"]

[[linker]]
name = "acyl"
atoms = ["C", "O"]
bonds = [[0, 1, 2]]
[[linker.sites]]
atom = 0
type = "C.co"
allow = ["N.am"]
"#;

    fn accepted() -> Vec<AcceptedComplex> {
        let library = FragmentLibrary::from_toml_str(LIBRARY, &GraphChemistry).unwrap();
        let config = AssemblyConfigBuilder::new().max_depth(1).build().unwrap();
        let filter = AcceptanceFilter::permissive();
        let reporter = ProgressReporter::new();
        enumerate::run(&library, &config, &GraphChemistry, &filter, &reporter)
            .unwrap()
            .accepted
    }

    #[test]
    fn writes_header_and_one_row_per_complex() {
        let accepted = accepted();
        let mut buffer = Vec::new();
        {
            let mut writer = ComplexWriter::new(&mut buffer).unwrap();
            for complex in &accepted {
                writer.write(complex).unwrap();
            }
            assert_eq!(writer.finish().unwrap(), 1);
        }

        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("index,name,depth,atoms,bonds,open_valence,score")
        );
        let row = lines.next().unwrap();
        let index = accepted[0].complex.index().to_string();
        assert_eq!(row, format!("{},amine+acyl,1,4,3,0,", index));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn scores_are_written_when_present() {
        let mut complex = accepted().remove(0);
        complex.score = Some(0.75);
        let mut buffer = Vec::new();
        {
            let mut writer = ComplexWriter::new(&mut buffer).unwrap();
            writer.write(&complex).unwrap();
            writer.finish().unwrap();
        }
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.lines().nth(1).unwrap().ends_with(",0.75"));
    }
}
