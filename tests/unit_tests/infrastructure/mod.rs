mod in_memory_recording_repository_test;
