//! Interactive text menu.
//!
//! The menu is the only caller of the registry: it prompts for raw text, parses appointment
//! date/times, invokes the registry and prints results. It is generic over its input and
//! output so it can be driven from a script in tests.

use healthmon_core::datetime::{self, default_reminder_window};
use healthmon_core::{
    format_moment, parse_appointment_datetime, Moment, PatientRegistry, RegistryError,
};
use std::io::{self, BufRead, Write};
use std::ops::ControlFlow;
use std::str::FromStr;

const MENU_TEXT: &str = "\n--- Automatic Health Monitoring System ---
1. Add Patient Record
2. View Patient Record
3. Add Diagnosis
4. Schedule Appointment
5. Cancel Appointment
6. View Appointment Reminders
7. Exit";

const DATETIME_PROMPT: &str = "Enter Appointment Date & Time (YYYY-MM-DD HH:MM): ";

/// One of the seven menu actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    AddPatient,
    ViewPatient,
    AddDiagnosis,
    ScheduleAppointment,
    CancelAppointment,
    ViewReminders,
    Exit,
}

#[derive(Debug, PartialEq, Eq)]
pub struct InvalidChoice;

impl FromStr for MenuChoice {
    type Err = InvalidChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(Self::AddPatient),
            "2" => Ok(Self::ViewPatient),
            "3" => Ok(Self::AddDiagnosis),
            "4" => Ok(Self::ScheduleAppointment),
            "5" => Ok(Self::CancelAppointment),
            "6" => Ok(Self::ViewReminders),
            "7" => Ok(Self::Exit),
            _ => Err(InvalidChoice),
        }
    }
}

/// Menu loop state: the registry it drives, where it reads from and writes to, and the clock
/// used by the reminder scan.
pub struct Menu<R, W> {
    registry: PatientRegistry,
    input: R,
    output: W,
    clock: fn() -> Moment,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(registry: PatientRegistry, input: R, output: W) -> Self {
        Self {
            registry,
            input,
            output,
            clock: datetime::now,
        }
    }

    /// Replaces the wall clock used for reminders.
    pub fn with_clock(mut self, clock: fn() -> Moment) -> Self {
        self.clock = clock;
        self
    }

    /// Runs until the user chooses Exit or input ends.
    ///
    /// # Errors
    ///
    /// Only I/O errors on the underlying reader or writer are returned.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            writeln!(self.output, "{MENU_TEXT}")?;
            let Some(line) = self.prompt("Enter your choice (1/7): ")? else {
                tracing::debug!("input closed, leaving menu");
                break;
            };

            let flow = match line.parse::<MenuChoice>() {
                Ok(choice) => self.dispatch(choice)?,
                Err(InvalidChoice) => {
                    writeln!(self.output, "Invalid choice! Please try again.")?;
                    ControlFlow::Continue(())
                }
            };

            if flow.is_break() {
                break;
            }
        }
        self.output.flush()
    }

    fn dispatch(&mut self, choice: MenuChoice) -> io::Result<ControlFlow<()>> {
        tracing::debug!(?choice, "menu action");
        match choice {
            MenuChoice::AddPatient => self.add_patient(),
            MenuChoice::ViewPatient => self.view_patient(),
            MenuChoice::AddDiagnosis => self.add_diagnosis(),
            MenuChoice::ScheduleAppointment => self.schedule_appointment(),
            MenuChoice::CancelAppointment => self.cancel_appointment(),
            MenuChoice::ViewReminders => {
                self.view_reminders()?;
                Ok(ControlFlow::Continue(()))
            }
            MenuChoice::Exit => {
                writeln!(self.output, "Exiting the system. Goodbye!")?;
                Ok(ControlFlow::Break(()))
            }
        }
    }

    /// Writes `label`, then reads one line with its line terminator removed.
    ///
    /// Returns `None` at end of input.
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed_len = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed_len);
        Ok(Some(line))
    }

    /// Prompts for each label in turn. `None` means input ended part way through.
    fn prompt_all<const N: usize>(&mut self, labels: [&str; N]) -> io::Result<Option<[String; N]>> {
        let mut answers: [String; N] = std::array::from_fn(|_| String::new());
        for (answer, label) in answers.iter_mut().zip(labels) {
            match self.prompt(label)? {
                Some(line) => *answer = line,
                None => return Ok(None),
            }
        }
        Ok(Some(answers))
    }

    fn parse_datetime(&mut self, raw: &str) -> io::Result<Option<Moment>> {
        match parse_appointment_datetime(raw) {
            Ok(moment) => Ok(Some(moment)),
            Err(err) => {
                tracing::debug!(error = %err, "rejected appointment date/time");
                writeln!(self.output, "\n{err}")?;
                Ok(None)
            }
        }
    }

    fn add_patient(&mut self) -> io::Result<ControlFlow<()>> {
        let Some([id, name, age, gender]) = self.prompt_all([
            "Enter Patient ID: ",
            "Enter Patient Name: ",
            "Enter Patient Age: ",
            "Enter Patient Gender: ",
        ])?
        else {
            return Ok(ControlFlow::Break(()));
        };

        match self.registry.add_patient(id.as_str(), name.as_str(), age, gender) {
            Ok(()) => writeln!(self.output, "\nPatient {name} (ID: {id}) added successfully!")?,
            Err(RegistryError::AlreadyExists(_)) => writeln!(
                self.output,
                "\nPatient ID {id} already exists. Cannot add duplicate patient."
            )?,
            Err(err) => writeln!(self.output, "\n{err}")?,
        }
        Ok(ControlFlow::Continue(()))
    }

    fn view_patient(&mut self) -> io::Result<ControlFlow<()>> {
        let Some([id]) = self.prompt_all(["Enter Patient ID: "])? else {
            return Ok(ControlFlow::Break(()));
        };

        let snapshot = match self.registry.view_patient(&id) {
            Ok(snapshot) => snapshot,
            Err(_) => {
                writeln!(self.output, "\nNo record found for patient ID {id}.")?;
                return Ok(ControlFlow::Continue(()));
            }
        };

        writeln!(
            self.output,
            "\nPatient ID: {}, Name: {}, Age: {}, Gender: {}",
            snapshot.id, snapshot.name, snapshot.age, snapshot.gender
        )?;

        if snapshot.has_diagnoses() {
            writeln!(
                self.output,
                "\nDiagnosis history for {} (ID: {}):",
                snapshot.name, snapshot.id
            )?;
            for entry in &snapshot.diagnoses {
                writeln!(self.output, "{entry}")?;
            }
        } else {
            writeln!(
                self.output,
                "\nNo diagnosis history for {} (ID: {}).",
                snapshot.name, snapshot.id
            )?;
        }

        if snapshot.has_appointments() {
            writeln!(
                self.output,
                "\nUpcoming appointments for {} (ID: {}):",
                snapshot.name, snapshot.id
            )?;
            for appointment in &snapshot.appointments {
                writeln!(self.output, "{appointment}")?;
            }
        } else {
            writeln!(
                self.output,
                "\nNo upcoming appointments for {} (ID: {}).",
                snapshot.name, snapshot.id
            )?;
        }
        Ok(ControlFlow::Continue(()))
    }

    fn add_diagnosis(&mut self) -> io::Result<ControlFlow<()>> {
        let Some([id, diagnosis, prescription]) = self.prompt_all([
            "Enter Patient ID: ",
            "Enter Diagnosis: ",
            "Enter Prescription: ",
        ])?
        else {
            return Ok(ControlFlow::Break(()));
        };

        match self.registry.add_diagnosis(&id, diagnosis, prescription) {
            Ok(()) => {
                let name = self.patient_name(&id);
                writeln!(
                    self.output,
                    "\nDiagnosis and prescription added for {name} (ID: {id})."
                )?;
            }
            Err(_) => writeln!(
                self.output,
                "\nNo record found for patient ID {id}. Cannot add diagnosis."
            )?,
        }
        Ok(ControlFlow::Continue(()))
    }

    fn schedule_appointment(&mut self) -> io::Result<ControlFlow<()>> {
        let Some([id, doctor, raw_datetime]) = self.prompt_all([
            "Enter Patient ID: ",
            "Enter Doctor's Name: ",
            DATETIME_PROMPT,
        ])?
        else {
            return Ok(ControlFlow::Break(()));
        };
        let Some(date_time) = self.parse_datetime(&raw_datetime)? else {
            return Ok(ControlFlow::Continue(()));
        };

        match self
            .registry
            .schedule_appointment(&id, doctor.as_str(), date_time)
        {
            Ok(()) => {
                let name = self.patient_name(&id);
                writeln!(
                    self.output,
                    "\nAppointment scheduled for {name} (ID: {id}) with Dr. {doctor} on {}.",
                    format_moment(&date_time)
                )?;
            }
            Err(_) => writeln!(
                self.output,
                "\nNo record found for patient ID {id}. Cannot schedule appointment."
            )?,
        }
        Ok(ControlFlow::Continue(()))
    }

    fn cancel_appointment(&mut self) -> io::Result<ControlFlow<()>> {
        let Some([id, doctor, raw_datetime]) = self.prompt_all([
            "Enter Patient ID: ",
            "Enter Doctor's Name: ",
            DATETIME_PROMPT,
        ])?
        else {
            return Ok(ControlFlow::Break(()));
        };
        let Some(date_time) = self.parse_datetime(&raw_datetime)? else {
            return Ok(ControlFlow::Continue(()));
        };
        let shown = format_moment(&date_time);

        match self.registry.cancel_appointment(&id, &doctor, &date_time) {
            Ok(true) => writeln!(
                self.output,
                "\nAppointment with {doctor} on {shown} has been cancelled."
            )?,
            Ok(false) => writeln!(
                self.output,
                "\nNo appointment found with {doctor} on {shown}."
            )?,
            Err(_) => writeln!(
                self.output,
                "\nNo record found for patient ID {id}. Cannot cancel appointment."
            )?,
        }
        Ok(ControlFlow::Continue(()))
    }

    fn view_reminders(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n--- Appointment Reminders ---")?;
        let now = (self.clock)();
        for reminder in self
            .registry
            .collect_reminders(now, default_reminder_window())
        {
            writeln!(self.output, "{reminder}")?;
        }
        Ok(())
    }

    fn patient_name(&self, id: &str) -> String {
        self.registry
            .get_patient(id)
            .map(|patient| patient.name().to_string())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};

    /// Shared sink for log output captured during a test.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("log buffer lock").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().expect("log buffer lock").clone()).expect("utf8 logs")
        }
    }

    fn fixed_now() -> Moment {
        parse_appointment_datetime("2024-01-01 09:00").expect("valid moment")
    }

    fn run_script(script: &str) -> (String, PatientRegistry) {
        let mut menu = Menu::new(
            PatientRegistry::new(),
            Cursor::new(script.as_bytes().to_vec()),
            Vec::new(),
        )
        .with_clock(fixed_now);
        menu.run().expect("menu run");

        let Menu {
            registry, output, ..
        } = menu;
        (String::from_utf8(output).expect("utf8 output"), registry)
    }

    #[test]
    fn parses_menu_choices() {
        assert_eq!("1".parse::<MenuChoice>(), Ok(MenuChoice::AddPatient));
        assert_eq!(" 6 \n".parse::<MenuChoice>(), Ok(MenuChoice::ViewReminders));
        assert_eq!("7".parse::<MenuChoice>(), Ok(MenuChoice::Exit));
        assert_eq!("8".parse::<MenuChoice>(), Err(InvalidChoice));
        assert_eq!("".parse::<MenuChoice>(), Err(InvalidChoice));
    }

    #[test]
    fn invalid_choice_reprompts() {
        let (out, _) = run_script("9\nabc\n7\n");
        assert_eq!(out.matches("Invalid choice! Please try again.").count(), 2);
        assert!(out.ends_with("Exiting the system. Goodbye!\n"));
    }

    #[test]
    fn end_of_input_exits_cleanly() {
        let (out, registry) = run_script("1\nP1\nAlice\n");
        assert!(registry.is_empty());
        assert!(!out.contains("added successfully"));
    }

    #[test]
    fn end_to_end_session() {
        let script = "\
1\nP1\nAlice\n30\nF\n\
1\nP1\nAlice\n30\nF\n\
4\nP1\nSmith\n2024-01-01 10:00\n\
2\nP1\n\
5\nP1\nJones\n2024-01-01 10:00\n\
5\nP1\nSmith\n2024-01-01 10:00\n\
2\nP1\n\
7\n";
        let (out, registry) = run_script(script);

        assert!(out.contains("Patient Alice (ID: P1) added successfully!"));
        assert!(out.contains("Patient ID P1 already exists. Cannot add duplicate patient."));
        assert!(out.contains(
            "Appointment scheduled for Alice (ID: P1) with Dr. Smith on 2024-01-01 10:00."
        ));
        assert!(out.contains("Patient ID: P1, Name: Alice, Age: 30, Gender: F"));
        assert!(out.contains("Doctor: Smith, Date & Time: 2024-01-01 10:00"));
        assert!(out.contains("No appointment found with Jones on 2024-01-01 10:00."));
        assert!(out.contains("Appointment with Smith on 2024-01-01 10:00 has been cancelled."));
        assert!(out.contains("No upcoming appointments for Alice (ID: P1)."));

        let patient = registry.get_patient("P1").expect("patient");
        assert!(patient.list_appointments().is_empty());
    }

    #[test]
    fn unknown_patient_messages_do_not_create_records() {
        let script = "\
2\nghost\n\
3\nghost\nflu\nrest\n\
4\nghost\nSmith\n2024-01-01 10:00\n\
5\nghost\nSmith\n2024-01-01 10:00\n\
7\n";
        let (out, registry) = run_script(script);

        assert!(out.contains("No record found for patient ID ghost.\n"));
        assert!(out.contains("No record found for patient ID ghost. Cannot add diagnosis."));
        assert!(out.contains("No record found for patient ID ghost. Cannot schedule appointment."));
        assert!(out.contains("No record found for patient ID ghost. Cannot cancel appointment."));
        assert!(registry.is_empty());
    }

    #[test]
    fn rejected_ids_are_not_logged_at_default_level() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let script = "2\nghost\n1\nP1\nA\n1\n1\n1\nP1\nB\n1\n1\n7\n";
        let (out, registry) = tracing::subscriber::with_default(subscriber, || run_script(script));

        assert!(out.contains("No record found for patient ID ghost."));
        assert!(out.contains("Patient ID P1 already exists. Cannot add duplicate patient."));
        assert!(!out.contains("WARN"));
        assert_eq!(logs.contents(), "");
        assert_eq!(registry.get_patient("P1").expect("patient").name(), "A");
    }

    #[test]
    fn malformed_datetime_on_cancel_keeps_appointment() {
        let script = "\
1\nP1\nAlice\n30\nF\n\
4\nP1\nSmith\n2024-01-01 10:00\n\
5\nP1\nSmith\n2024-01-01 ten\n\
7\n";
        let (out, registry) = run_script(script);

        assert!(out.contains("invalid date/time \"2024-01-01 ten\""));
        assert!(!out.contains("has been cancelled"));
        assert!(!out.contains("No appointment found"));
        assert_eq!(
            registry
                .get_patient("P1")
                .expect("patient")
                .list_appointments()
                .len(),
            1
        );
    }

    #[test]
    fn reminders_with_nothing_due_print_only_the_header() {
        let (out, _) = run_script("6\n1\nP1\nAlice\n30\nF\n6\n7\n");

        assert_eq!(out.matches("--- Appointment Reminders ---").count(), 2);
        assert!(!out.contains("Reminder:"));
    }

    #[test]
    fn diagnosis_history_is_shown_on_view() {
        let script = "\
1\nP1\nAlice\n30\nF\n\
2\nP1\n\
3\nP1\nflu\nrest\n\
2\nP1\n\
7\n";
        let (out, registry) = run_script(script);

        assert!(out.contains("No diagnosis history for Alice (ID: P1)."));
        assert!(out.contains("Diagnosis and prescription added for Alice (ID: P1)."));
        assert!(out.contains("Diagnosis history for Alice (ID: P1):"));
        assert!(out.contains(", Diagnosis: flu, Prescription: rest"));
        assert_eq!(
            registry
                .get_patient("P1")
                .expect("patient")
                .list_diagnoses()
                .len(),
            1
        );
    }

    #[test]
    fn malformed_datetime_is_reported_and_nothing_is_scheduled() {
        let script = "\
1\nP1\nAlice\n30\nF\n\
4\nP1\nSmith\ntomorrow at ten\n\
7\n";
        let (out, registry) = run_script(script);

        assert!(out.contains("invalid date/time \"tomorrow at ten\""));
        assert!(registry
            .get_patient("P1")
            .expect("patient")
            .list_appointments()
            .is_empty());
    }

    #[test]
    fn reminders_use_injected_clock() {
        let script = "\
1\nP1\nAlice\n30\nF\n\
4\nP1\nSmith\n2024-01-01 10:00\n\
4\nP1\nPast\n2023-12-31 08:00\n\
4\nP1\nFar\n2024-01-03 09:00\n\
6\n\
7\n";
        let (out, _) = run_script(script);

        let reminders = out
            .split("--- Appointment Reminders ---\n")
            .nth(1)
            .expect("reminder section");
        assert!(reminders
            .contains("Reminder: Alice (ID: P1) has an appointment with Dr. Smith on 2024-01-01 10:00."));
        assert!(reminders.contains("with Dr. Past on 2023-12-31 08:00."));
        assert!(!reminders.contains("Dr. Far"));
    }

    #[test]
    fn line_endings_are_stripped_but_other_whitespace_kept() {
        let (out, registry) = run_script("1\r\nP1\r\n Alice \r\n30\r\nF\r\n7\r\n");

        assert!(out.contains("Patient  Alice  (ID: P1) added successfully!"));
        assert_eq!(registry.get_patient("P1").expect("patient").name(), " Alice ");
    }
}
