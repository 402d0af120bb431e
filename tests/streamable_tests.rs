//! Domain-object round trips through the streamable boundary, including
//! file-backed streams.

use wirestream::{
    BytesSink, FileSink, FileSource, SliceSource, Sink, Source, StreamInput, StreamOutput,
    StreamResult, Streamable,
};

use tempfile::tempdir;

#[derive(Debug, Default, Clone, PartialEq)]
struct Person {
    id: i32,
    name: String,
    age: i16,
    features: Vec<f64>,
}

impl Streamable for Person {
    fn read_from<S: Source>(&mut self, input: &mut StreamInput<S>) -> StreamResult<()> {
        self.id = input.read_int()?;
        self.name = input.read_string()?;
        self.age = input.read_short()?;
        self.features = input.read_double_array()?;
        Ok(())
    }

    fn write_to<S: Sink>(&self, output: &mut StreamOutput<S>) -> StreamResult<()> {
        output.write_int(self.id)?;
        output.write_string(&self.name)?;
        output.write_short(self.age)?;
        output.write_double_array(&self.features)
    }
}

#[derive(Debug, Default, PartialEq)]
struct Team {
    name: String,
    lead: Option<Person>,
    members: Vec<Person>,
}

impl Streamable for Team {
    fn read_from<S: Source>(&mut self, input: &mut StreamInput<S>) -> StreamResult<()> {
        self.name = input.read_string()?;
        self.lead = input.read_optional_streamable()?;
        self.members = input.read_streamable_list()?;
        Ok(())
    }

    fn write_to<S: Sink>(&self, output: &mut StreamOutput<S>) -> StreamResult<()> {
        output.write_string(&self.name)?;
        output.write_optional_streamable(self.lead.as_ref())?;
        output.write_streamable_list(&self.members)
    }
}

fn sample_person() -> Person {
    Person {
        id: 1,
        name: "abc".to_owned(),
        age: 20,
        features: vec![0.1, 0.2, 0.3],
    }
}

#[test]
fn person_encodes_to_exactly_35_bytes() {
    let person = sample_person();
    let mut out = StreamOutput::new(BytesSink::new());
    person.write_to(&mut out).unwrap();
    let bytes = out.into_inner().into_bytes();

    // 4 (id) + 1+3 (name) + 2 (age) + 1+24 (features)
    assert_eq!(bytes.len(), 35);

    let mut input = StreamInput::new(SliceSource::new(&bytes));
    let decoded: Person = input.read_streamable().unwrap();
    assert_eq!(decoded, person);
}

#[test]
fn person_round_trips_through_a_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("person.bin");

    let person = Person {
        id: 7,
        name: "this is my name".to_owned(),
        age: 33,
        features: (0..1024).map(|i| f64::from(i) * 0.5).collect(),
    };

    {
        let mut out = StreamOutput::new(FileSink::create(&path).unwrap());
        person.write_to(&mut out).unwrap();
        out.close().unwrap();
    }

    let mut input = StreamInput::new(FileSource::open(&path).unwrap());
    let decoded: Person = input.read_streamable().unwrap();
    assert_eq!(decoded, person);
}

#[test]
fn nested_streamables_round_trip() {
    let team = Team {
        name: "search".to_owned(),
        lead: Some(sample_person()),
        members: vec![
            Person { id: 2, name: "b".to_owned(), age: 31, features: vec![] },
            Person { id: 3, name: "c".to_owned(), age: 27, features: vec![1.0] },
        ],
    };

    let mut out = StreamOutput::new(BytesSink::new());
    team.write_to(&mut out).unwrap();
    let bytes = out.into_inner().into_bytes();

    let mut input = StreamInput::new(SliceSource::new(&bytes));
    let decoded: Team = input.read_streamable().unwrap();
    assert_eq!(decoded, team);
}

#[test]
fn absent_lead_costs_a_single_byte() {
    let team = Team { name: String::new(), lead: None, members: vec![] };

    let mut out = StreamOutput::new(BytesSink::new());
    team.write_to(&mut out).unwrap();
    let bytes = out.into_inner().into_bytes();
    // empty name (1) + absent lead (1) + empty member list (1)
    assert_eq!(bytes, vec![0, 0, 0]);
}

#[test]
fn truncated_objects_fail_without_partial_results() {
    let person = sample_person();
    let mut out = StreamOutput::new(BytesSink::new());
    person.write_to(&mut out).unwrap();
    let bytes = out.into_inner().into_bytes();

    for cut in 0..bytes.len() {
        let mut input = StreamInput::new(SliceSource::new(&bytes[..cut]));
        assert!(input.read_streamable::<Person>().is_err(), "cut at {cut} should fail");
    }
}

#[test]
fn streamable_lists_round_trip_empty_and_large() {
    let people: Vec<Person> = (0..200)
        .map(|i| Person {
            id: i,
            name: format!("person-{i}"),
            age: (i % 90) as i16,
            features: vec![f64::from(i); 3],
        })
        .collect();

    for list in [&Vec::new(), &people] {
        let mut out = StreamOutput::new(BytesSink::new());
        out.write_streamable_list(list).unwrap();
        let bytes = out.into_inner().into_bytes();

        let mut input = StreamInput::new(SliceSource::new(&bytes));
        let decoded: Vec<Person> = input.read_streamable_list().unwrap();
        assert_eq!(&decoded, list);
    }
}
