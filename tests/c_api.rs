use std::os::raw::{c_int, c_void};
use std::ptr;
use std::sync::atomic::{AtomicI64, Ordering};

use byte_list::other_c_list::*;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
struct LineInfo {
    number: i32,
    rank: i32,
    weight: f64,
}

extern "C" fn by_number(a: *const c_void, b: *const c_void) -> c_int {
    let (a, b) = unsafe { (&*a.cast::<LineInfo>(), &*b.cast::<LineInfo>()) };
    a.number - b.number
}

extern "C" fn ascending_int(a: *const c_void, b: *const c_void) -> c_int {
    let (a, b) = unsafe { (*a.cast::<i32>(), *b.cast::<i32>()) };
    a.cmp(&b) as c_int
}

static SUM: AtomicI64 = AtomicI64::new(0);

extern "C" fn add_to_sum(data: *mut c_void) {
    let value = unsafe { *data.cast::<i32>() };
    SUM.fetch_add(i64::from(value), Ordering::SeqCst);
}

extern "C" fn double_weight(data: *mut c_void) {
    let info = unsafe { &mut *data.cast::<LineInfo>() };
    info.weight *= 2.0;
}

fn push_int(list: *mut CByteList, value: i32) -> bool {
    byte_list_push_back(list, (&value as *const i32).cast())
}

fn pop_front_int(list: *mut CByteList) -> Option<i32> {
    let mut out = 0i32;
    byte_list_pop_front(list, (&mut out as *mut i32).cast()).then_some(out)
}

#[test]
fn zero_element_size_returns_null() {
    assert!(byte_list_new(0).is_null());
}

#[test]
fn sort_and_sum_through_callbacks() {
    let list = byte_list_new(size_of::<i32>());
    for value in [5, 3, 8, 1] {
        assert!(push_int(list, value));
    }

    SUM.store(0, Ordering::SeqCst);
    byte_list_for_each(list, Some(add_to_sum));
    assert_eq!(SUM.load(Ordering::SeqCst), 17);

    assert!(byte_list_sort(list, Some(ascending_int)) > 0);

    let mut sorted = Vec::new();
    while let Some(value) = pop_front_int(list) {
        sorted.push(value);
    }
    assert_eq!(sorted, vec![1, 3, 5, 8]);
    assert!(byte_list_is_empty(list));

    byte_list_free(list);
}

#[test]
fn push_front_and_pop_back() {
    let list = byte_list_new(size_of::<i32>());
    for value in [1, 2, 3] {
        assert!(byte_list_push_front(list, (&value as *const i32).cast()));
    }
    assert_eq!(byte_list_size(list), 3);

    let mut out = 0i32;
    assert!(byte_list_pop_back(list, (&mut out as *mut i32).cast()));
    assert_eq!(out, 1);
    assert_eq!(pop_front_int(list), Some(3));
    assert_eq!(pop_front_int(list), Some(2));
    assert_eq!(pop_front_int(list), None);

    byte_list_free(list);
}

#[test]
fn struct_payloads_are_aligned_for_callbacks() {
    let list = byte_list_new(size_of::<LineInfo>());
    for (number, weight) in [(3, 0.5), (1, 1.5), (2, 2.5)] {
        let info = LineInfo {
            number,
            rank: -number,
            weight,
        };
        assert!(byte_list_push_back(list, (&info as *const LineInfo).cast()));
    }

    byte_list_sort(list, Some(by_number));
    byte_list_for_each(list, Some(double_weight));

    let mut out = LineInfo {
        number: 0,
        rank: 0,
        weight: 0.0,
    };
    assert!(byte_list_pop_front(list, (&mut out as *mut LineInfo).cast()));
    assert_eq!(
        out,
        LineInfo {
            number: 1,
            rank: -1,
            weight: 3.0
        }
    );

    byte_list_free(list);
}

#[test]
fn empty_pop_leaves_output_untouched() {
    let list = byte_list_new(size_of::<i32>());
    let mut out = -1i32;
    assert!(!byte_list_pop_back(list, (&mut out as *mut i32).cast()));
    assert!(!byte_list_pop_front(list, (&mut out as *mut i32).cast()));
    assert_eq!(out, -1);
    byte_list_free(list);
}

#[test]
fn null_output_discards_element() {
    let list = byte_list_new(size_of::<i32>());
    assert!(push_int(list, 7));
    assert!(byte_list_pop_back(list, ptr::null_mut()));
    assert!(byte_list_is_empty(list));
    byte_list_free(list);
}

#[test]
fn null_arguments_are_rejected() {
    let list = byte_list_new(size_of::<i32>());
    assert!(!byte_list_push_back(list, ptr::null()));
    assert!(!byte_list_push_front(ptr::null_mut(), ptr::null()));
    assert!(!byte_list_pop_front(ptr::null_mut(), ptr::null_mut()));
    assert_eq!(byte_list_size(ptr::null()), 0);
    assert!(byte_list_is_empty(ptr::null()));
    byte_list_for_each(list, None);
    assert_eq!(byte_list_sort(list, None), 0);
    byte_list_free(ptr::null_mut());
    byte_list_free(list);
}

#[test]
fn clear_keeps_list_usable() {
    let list = byte_list_new(size_of::<i32>());
    for value in 0..5 {
        assert!(push_int(list, value));
    }
    byte_list_clear(list);
    assert_eq!(byte_list_size(list), 0);
    assert!(push_int(list, 9));
    assert_eq!(pop_front_int(list), Some(9));
    byte_list_free(list);
}
