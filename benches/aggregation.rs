use chrono::{Duration, NaiveDate, NaiveTime};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tempfile::tempdir;
use tutor_core::domain::{
    Course, DateRange, Expense, Gender, Payment, PaymentMethod, Session, Student, Teacher,
};
use tutor_core::reports::{aggregate_financials, aggregate_teacher_hours, monthly_trend};
use tutor_core::storage::{decode_lenient, json_backend::save_store_to_path};
use tutor_core::store::RecordStore;

fn build_sample_store(record_count: usize) -> RecordStore {
    let mut store = RecordStore::new();
    let teachers: Vec<_> = (0..10)
        .map(|idx| store.add_teacher(Teacher::new(format!("Teacher {idx}"), 20.0 + idx as f64)))
        .collect();
    let courses: Vec<_> = teachers
        .iter()
        .enumerate()
        .map(|(idx, teacher)| {
            store.add_course(Course::new(format!("Course {idx}"), 30.0, Some(*teacher)))
        })
        .collect();
    let students: Vec<_> = (0..200)
        .map(|idx| store.add_student(Student::new(format!("Student {idx}"), Gender::F)))
        .collect();

    let start_date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    let start_time = NaiveTime::from_hms_opt(14, 0, 0).unwrap();
    let end_time = NaiveTime::from_hms_opt(15, 30, 0).unwrap();
    for idx in 0..record_count {
        let date = start_date + Duration::days((idx % 365) as i64);
        let course = courses[idx % courses.len()];
        let teacher = teachers[idx % teachers.len()];
        let student = students[idx % students.len()];
        store.add_payment(Payment {
            id: 0,
            date,
            student_id: student,
            course_id: course,
            teacher_id: Some(teacher),
            hourly_rate: 30.0,
            purchased_hours: 5.0,
            discounted_tuition: 0.0,
            amount_paid: 150.0,
            payment_method: PaymentMethod::Card,
        });
        store.add_session(Session {
            id: 0,
            date,
            student_id: student,
            course_id: course,
            teacher_id: Some(teacher),
            start_time,
            end_time,
            hours: 1.5,
        });
        if idx % 10 == 0 {
            store.add_expense(Expense::new(date, "Supplies", 12.5));
        }
    }
    store
}

fn bench_store_io(c: &mut Criterion) {
    let store = build_sample_store(black_box(10_000));
    let dir = tempdir().expect("tempdir");
    let file_path = dir.path().join("tutoring_center.json");

    c.bench_function("store_save_10k", |b| {
        b.iter(|| save_store_to_path(&store, &file_path).expect("save store"))
    });

    save_store_to_path(&store, &file_path).expect("seed");
    let raw = std::fs::read_to_string(&file_path).expect("read seed");

    c.bench_function("store_decode_10k", |b| {
        b.iter(|| black_box(decode_lenient(&raw).expect("decode store")))
    });
}

fn bench_reports(c: &mut Criterion) {
    let store = build_sample_store(black_box(10_000));
    let today = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
    let quarter = DateRange::new(
        NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
        NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
    );

    c.bench_function("financials_quarter", |b| {
        b.iter(|| black_box(aggregate_financials(&store, Some(quarter))))
    });

    c.bench_function("attendance_quarter", |b| {
        b.iter(|| black_box(aggregate_teacher_hours(&store, Some(quarter))))
    });

    c.bench_function("trend_six_months", |b| {
        b.iter(|| black_box(monthly_trend(&store, 6, today)))
    });
}

criterion_group!(benches, bench_store_io, bench_reports);
criterion_main!(benches);
